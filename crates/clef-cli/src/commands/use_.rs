use miette::Result;

use clef_core::lilypond;
use clef_core::settings::Settings;
use clef_util::{fs, progress};

pub fn exec(version: &str) -> Result<()> {
    let mut settings = Settings::load()?;
    lilypond::set_default(&fs::lilyponds_dir(), &mut settings, version)?;
    settings.save()?;
    progress::status("Default", &format!("LilyPond {version}"));
    Ok(())
}
