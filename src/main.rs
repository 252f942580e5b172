#[tokio::main]
async fn main() {
    guild_backend::run().await;
}
