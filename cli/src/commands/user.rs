use std::path::Path;

use anyhow::Result;

use lighter_core::auth::CredentialFile;
use lighter_core::models::Username;

pub(crate) fn cmd_user_add(users_path: &Path, name: &str, password: &str) -> Result<()> {
    let user = Username::new(name)?;
    let mut creds = CredentialFile::load(users_path)?;
    creds.set_password(user.as_str(), password)?;
    println!("Saved user '{user}'");
    Ok(())
}

pub(crate) fn cmd_user_remove(users_path: &Path, name: &str) -> Result<()> {
    let mut creds = CredentialFile::load(users_path)?;
    if creds.remove(name)? {
        println!("Removed user '{name}'");
    } else {
        eprintln!("No user named '{name}'");
    }
    Ok(())
}

pub(crate) fn cmd_user_list(users_path: &Path) -> Result<()> {
    let creds = CredentialFile::load(users_path)?;
    let mut any = false;
    for name in creds.usernames() {
        println!("{name}");
        any = true;
    }
    if !any {
        eprintln!("No users yet. Add one with: lighter user add NAME --password PASSWORD");
    }
    Ok(())
}
