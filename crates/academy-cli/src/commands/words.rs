//! The `academy words` command.

use anyhow::Result;

use academy_core::words::amount_in_words;

pub fn execute(amount: f64) -> Result<()> {
    println!("{}", amount_in_words(amount)?);
    Ok(())
}
