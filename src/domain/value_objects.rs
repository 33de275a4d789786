// Domain value objects shared by the MIP model and the TSP formulation

use std::fmt;
use std::str::FromStr;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Integer number (x ∈ ℤ)
    Integer,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Terminal status reported by a solver backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Optimal, but the backend flagged numerical trouble
    OptimalInaccurate,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// Time limit reached
    TimeLimit,
    /// Iteration limit reached
    IterationLimit,
    /// Node limit reached (MIP)
    NodeLimit,
    /// Solver error occurred
    Error,
}

impl SolutionStatus {
    /// Only these two statuses allow a tour to be extracted.
    pub fn is_accepted_optimal(&self) -> bool {
        matches!(
            self,
            SolutionStatus::Optimal | SolutionStatus::OptimalInaccurate
        )
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::OptimalInaccurate => write!(f, "Optimal (inaccurate)"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
            SolutionStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
            SolutionStatus::NodeLimit => write!(f, "Node Limit Reached"),
            SolutionStatus::Error => write!(f, "Error"),
        }
    }
}

/// MIP backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Pick the strongest backend compiled in
    Auto,
    /// Pure-Rust microlp through good_lp
    MicroLp,
    /// COIN-OR CBC solver
    CoinCbc,
    /// HiGHS solver
    Highs,
}

impl SolverBackend {
    pub const ALL: [SolverBackend; 3] = [
        SolverBackend::Highs,
        SolverBackend::CoinCbc,
        SolverBackend::MicroLp,
    ];

    /// Whether the backend was compiled into this build
    pub fn is_compiled(&self) -> bool {
        match self {
            SolverBackend::Auto => SolverBackend::ALL.iter().any(|b| b.is_compiled()),
            SolverBackend::MicroLp => cfg!(feature = "microlp"),
            SolverBackend::CoinCbc => cfg!(feature = "coin_cbc"),
            SolverBackend::Highs => cfg!(feature = "highs"),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            SolverBackend::Auto => "auto",
            SolverBackend::MicroLp => "microlp",
            SolverBackend::CoinCbc => "coin-cbc",
            SolverBackend::Highs => "highs",
        }
    }
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::MicroLp => write!(f, "microlp"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "microlp" => Ok(SolverBackend::MicroLp),
            "coin-cbc" | "coin_cbc" | "cbc" => Ok(SolverBackend::CoinCbc),
            "highs" => Ok(SolverBackend::Highs),
            other => Err(format!(
                "unknown solver backend '{}' (expected auto, microlp, coin-cbc or highs)",
                other
            )),
        }
    }
}
