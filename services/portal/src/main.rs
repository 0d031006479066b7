use festival_portal::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("festival-portal: {err}");
        std::process::exit(1);
    }
}
