//! Interactive admin console
//!
//! Reads configuration from the environment (and `.env`), restores the saved
//! session if it is still valid, then runs the command loop on stdin.
//!
//! Run: cargo run -p doan-admin

use std::io::{self, Write};

use anyhow::Context;
use doan_admin::command::HELP;
use doan_admin::{App, Command, Flow};
use doan_client::logger::init_logger_with_file;
use doan_client::{ApiClient, ClientConfig, NetworkHttpClient, SessionContext, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Invalid configuration")?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(base_url = %config.base_url, "Starting admin console");

    let api = ApiClient::from_config(&config).context("Failed to build HTTP client")?;
    let session = SessionContext::restore(SessionStore::new(config.session_dir.clone()));
    let mut app = App::new(api, session, config.page_size);

    println!("\nĐoàn Thanh niên · Bảng quản trị");
    println!("==============================\n");

    loop {
        if !app.is_signed_in() && !sign_in(&mut app).await {
            break;
        }
        app.refresh().await;
        if run(&mut app).await == Flow::Quit {
            break;
        }
    }

    println!("Tạm biệt!");
    Ok(())
}

/// Prompt until a login succeeds; false when the user gives up
async fn sign_in(app: &mut App<NetworkHttpClient>) -> bool {
    if let Some(notice) = app.notice() {
        println!("{notice}");
    }
    loop {
        println!("🔑 Đăng nhập (để trống tên đăng nhập để thoát)");
        let username = match get_input("Tên đăng nhập: ") {
            Some(u) if !u.is_empty() => u,
            _ => return false,
        };
        let Some(password) = get_input("Mật khẩu: ") else {
            return false;
        };
        match app.login(&username, &password).await {
            Ok(()) => return true,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                println!("[!] {}\n", e.user_message());
            }
        }
    }
}

async fn run(app: &mut App<NetworkHttpClient>) -> Flow {
    println!("{}", app.render());
    loop {
        let Some(line) = get_input("> ") else {
            return Flow::Quit;
        };
        let command = match Command::parse(&line) {
            Ok(Some(Command::Help)) => {
                println!("{HELP}");
                continue;
            }
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("[!] {msg}");
                continue;
            }
        };
        match app.handle(command).await {
            Flow::Continue => println!("{}", app.render()),
            flow => return flow,
        }
    }
}

/// One trimmed line from stdin; `None` at end of input
fn get_input(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}
