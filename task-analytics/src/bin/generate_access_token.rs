// task-analytics/src/bin/generate_access_token.rs
//
// 開発用: 指定したユーザー ID のアクセストークンを発行する
use std::env;
use std::process;
use task_analytics::utils::jwt::{JwtConfig, JwtManager};
use uuid::Uuid;

fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    // 引数が無ければ新しいユーザー ID を割り当てる
    let user_id = match args.get(1) {
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => id,
            Err(_) => {
                eprintln!("Error: '{}' is not a valid UUID", raw);
                process::exit(1);
            }
        },
        None => Uuid::new_v4(),
    };

    let config = match JwtConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading JWT configuration: {}", e);
            process::exit(1);
        }
    };

    let manager = match JwtManager::new(config) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error creating JWT manager: {}", e);
            process::exit(1);
        }
    };

    match manager.generate_access_token(user_id) {
        Ok(token) => {
            println!("\n=== Access Token Generated ===");
            println!("User ID: {}", user_id);
            println!("Expires in: {} minutes", manager.access_token_expiry_minutes());
            println!("Token: {}", token);
            println!("\nExample:");
            println!(
                "curl -H 'Authorization: Bearer {}' http://localhost:3000/analytics",
                token
            );
        }
        Err(e) => {
            eprintln!("Error generating access token: {}", e);
            process::exit(1);
        }
    }
}
