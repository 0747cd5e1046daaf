use anyhow::Result;
use dialoguer::{Input, Password};
use log::info;

use crate::auth::credentials::{Credentials, PartialCredentials, PASSWORD_VAR, TOKEN_VAR, USERNAME_VAR};

/// Ask for whichever credential fields are still missing
pub fn prompt_credentials(known: PartialCredentials) -> Result<Credentials> {
    let credentials = fill_missing(known, |field| {
        let value = match field {
            USERNAME_VAR => Input::<String>::new().with_prompt("Salesforce username").interact_text()?,
            PASSWORD_VAR => Password::new().with_prompt("Password").interact()?,
            _ => Password::new()
                .with_prompt("Security token (leave empty for trusted networks)")
                .allow_empty_password(true)
                .interact()?,
        };
        Ok(value)
    })?;

    info!("Using credentials entered at the prompt");
    Ok(credentials)
}

fn fill_missing<F>(known: PartialCredentials, mut ask: F) -> Result<Credentials>
where
    F: FnMut(&'static str) -> Result<String>,
{
    let mut take = |value: Option<String>, field| match value {
        Some(v) => Ok(v),
        None => ask(field),
    };

    Ok(Credentials {
        username: take(known.username, USERNAME_VAR)?,
        password: take(known.password, PASSWORD_VAR)?,
        token: take(known.token, TOKEN_VAR)?,
    })
}
