#[tokio::main]
async fn main() {
    pantry_server::start_server().await;
}
