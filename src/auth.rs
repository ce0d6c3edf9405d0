use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub fn read_secret() -> Result<Zeroizing<Vec<u8>>> {
    //  Environment Variable
    //  DECHEST_SECRET="supersecret" dechest unpack song.dech
    if let Ok(secret) = std::env::var("DECHEST_SECRET") {
        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret.into_bytes()));
        }
    }

    //  stdin (Pipeline)
    //  printf "%s" "$DECHEST_SECRET" | dechest unpack song.dech
    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        let secret = buf.trim_end().to_string();

        if !secret.is_empty() {
            return Ok(Zeroizing::new(secret.into_bytes()));
        }
    }

    bail!("no secret provided; set DECHEST_SECRET or pipe the secret on stdin")
}
