use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a development token with the configured secret")]
    Mint {
        #[arg(long, help = "User id placed in the `sub` claim")]
        user: Uuid,
        #[arg(long, help = "Mark the user as a superuser")]
        superuser: bool,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
        #[arg(long, help = "Lifetime in hours (defaults to security.jwt_expiry_hours)")]
        hours: Option<u64>,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Mint { user, superuser, email, hours } => {
            let security = &config::config().security;
            if security.jwt_secret.is_empty() {
                anyhow::bail!("JWT secret not configured; set SECURITY_JWT_SECRET");
            }

            let hours = hours.unwrap_or(security.jwt_expiry_hours);
            let claims = Claims::new(user, email, superuser, hours);
            let token = generate_jwt(&claims, &security.jwt_secret)?;

            if let OutputFormat::Text = output_format {
                // Bare token so it can be captured with $(modeler token mint ...)
                println!("{}", token);
                return Ok(());
            }

            output_success(
                &output_format,
                "Token issued",
                Some(json!({ "token": token, "user": user, "superuser": superuser, "expires_at": claims.exp })),
            )
        }
    }
}
