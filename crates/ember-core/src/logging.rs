pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter("debug,wgpu_core=info,naga=info")
        .init();
}
