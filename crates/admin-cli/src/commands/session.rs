use anyhow::Context;
use dialoguer::Password;
use services::services::admin::AdminClient;

use crate::support::with_spinner;

pub async fn login(admin: &AdminClient, email: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("password prompt failed")?,
    };
    with_spinner("Signing in", admin.login(email, &password)).await?;
    println!("Signed in as {email}");
    Ok(())
}

pub async fn logout(admin: &AdminClient) -> anyhow::Result<()> {
    admin.logout().await?;
    println!("Signed out");
    Ok(())
}
