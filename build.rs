fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/route_optimizer.proto");

    // Generated gRPC code is only needed by the server and its client demo
    if std::env::var_os("CARGO_FEATURE_SERVER").is_some() {
        tonic_build::compile_protos("proto/route_optimizer.proto")?;
    }

    Ok(())
}
