use std::path::PathBuf;

use clap::Parser;

use crate::auth::PartialCredentials;

#[derive(Parser, Debug)]
#[command(name = "salesforce-seed", version)]
#[command(about = "Load interdependent test records from an Excel workbook into a Salesforce org")]
pub struct Cli {
    /// Workbook with one sheet per record kind
    pub workbook: PathBuf,

    /// Salesforce username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Salesforce password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Security token appended to the password
    #[arg(short, long)]
    pub token: Option<String>,

    /// Create the users on the Users sheet instead of looking up existing ones
    #[arg(long)]
    pub create_users: bool,

    /// Log in through login.salesforce.com instead of the sandbox login host
    #[arg(long)]
    pub production: bool,

    /// Read credentials from this .env file (defaults to ./.env when present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Use this config file instead of the one in the user config directory
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn credentials(&self) -> PartialCredentials {
        PartialCredentials {
            username: self.username.clone(),
            password: self.password.clone(),
            token: self.token.clone(),
        }
    }
}
