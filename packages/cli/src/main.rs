//! Interactive console for the order dispatch system.

mod error;
mod render;
mod result_log;

use std::time::Duration;

use actors::Controller;
use chrono::Local;
use dispatch_core::DispatchConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::render::{render_status, render_summary};
use crate::result_log::{DEFAULT_RESULT_FILE, RESULT_FILE_ENV, ResultLog};

const MENU: &str = "MENU:
  1. Create Normal Order
  2. Create VIP Order
  3. Add Bot (+ Bot)
  4. Remove Bot (- Bot)
  5. View Current Status
  6. View Summary
  7. Exit
  8. Dump State (JSON)";

fn print_menu() {
    let rule = "=".repeat(50);
    println!("\n{}\n{}\n{}", rule, MENU, rule);
}

fn open_result_log() -> ResultLog {
    let path = std::env::var(RESULT_FILE_ENV).unwrap_or_else(|_| DEFAULT_RESULT_FILE.to_string());
    match ResultLog::create(&path) {
        Ok(log) => {
            tracing::info!("Order events go to {:?}", log.path());
            log
        }
        Err(e) => {
            println!("Warning: Could not open {}: {}", path, e);
            ResultLog::stdout_only()
        }
    }
}

/// Run one menu choice. Returns false when the operator asked to exit.
async fn dispatch_choice(controller: &Controller, choice: &str) -> Result<bool, CliError> {
    match choice {
        "1" => {
            controller.create_normal().await;
        }
        "2" => {
            controller.create_vip().await;
        }
        "3" => {
            controller.add_bot().await?;
        }
        "4" => {
            if !controller.remove_bot().await {
                println!("No bots available to remove.");
            }
        }
        "5" => {
            print!("{}", render_status(&controller.get_state().await));
        }
        "6" => {
            let snapshot = controller.get_state().await;
            let stats = controller.stats().await;
            print!("{}", render_summary(&snapshot, &stats));
        }
        "7" => {
            println!("\nExiting system. Goodbye!");
            return Ok(false);
        }
        "8" => {
            println!("{}", serde_json::to_string_pretty(&controller.get_state().await)?);
        }
        _ => println!("Invalid choice. Please select 1-8."),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let controller = Controller::with_config(DispatchConfig::from_env(), open_result_log());

    println!("[{}] System initialized", Local::now().format("%H:%M:%S"));
    println!("\n=== McDonald's Order Management System ===");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_menu();
        println!("\nSelect an action: ");

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match dispatch_choice(&controller, line.trim()).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::error!("Command failed: {}", e);
                println!("Error: {}", e);
            }
        }

        // Small delay for readability
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    controller.shutdown().await;
    Ok(())
}
