use anyhow::Result;

// The bare binary registers no upgrade packages; installations embed their
// own by calling stepup_cli::run with their package list.
fn main() -> Result<()> {
    stepup_cli::run(Vec::new())
}
