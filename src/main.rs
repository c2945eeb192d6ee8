use std::fmt::{Debug, Display};

use ledgerly::core::{get_subscriber, init_subscriber, AppConfig};
use ledgerly::ledgerly_web_server::LedgerlyWebServer;
use tokio::task::JoinError;

use colored::*;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let file_appender = tracing_appender::rolling::daily("/var/tmp/log/ledgerly", "app");

    let subscriber = get_subscriber("ledgerly".into(), "info".into(), file_appender);
    init_subscriber(subscriber);

    let config = AppConfig::new().expect("cant build our appConfig object");

    let ledgerly_web_server = LedgerlyWebServer::build(config.clone())
        .await
        .expect("application could not be built");

    let server_task = tokio::spawn(ledgerly_web_server.run_until_stopped());

    println!("{}", "-----------------------------------------".green());
    println!(
        "{}",
        format!(
            "🚀 Server started on Addr: {}:{}",
            config.ledgerly_server_config.host, config.ledgerly_server_config.port
        )
    );
    println!("{}", "-----------------------------------------".green());

    tokio::select! {
        o = server_task => {report_exit("ledgerly web server", o);}
    }
    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            )
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{}' task failed to complete",
                task_name
            )
        }
    }
}
