#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = todo_web::config::Config::from_env()?;
    todo_web::web::start_web_server(config).await
}
