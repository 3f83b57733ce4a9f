use crate::composer::{Configurable, IconComposer};
use crate::export::DirectorySink;
use crate::profile::StyleProfile;
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "exticon", version, about = "Compose Lucide icons into extension icons")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available icon names
    List {
        /// Only names containing this text (case-insensitive)
        #[arg(short = 's', long = "search", default_value = "")]
        search: String,
    },

    /// Render the composition as SVG
    Svg {
        #[command(flatten)]
        style: StyleArgs,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Render the composition as a PNG of one size
    Png {
        #[command(flatten)]
        style: StyleArgs,

        /// Pixel size of the output
        #[arg(long = "size", default_value_t = 128)]
        size: u32,

        /// Output file
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },

    /// Write icon-<size>.png for every export size plus icon.svg
    Export {
        #[command(flatten)]
        style: StyleArgs,

        /// Additional size to export (repeatable), e.g. 256, 512, 1024
        #[arg(long = "extra")]
        extra: Vec<u32>,

        /// Output directory
        #[arg(short = 'd', long = "dir")]
        dir: PathBuf,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct StyleArgs {
    /// Style profile JSON file
    #[arg(short = 'p', long = "profile")]
    pub profile: Option<PathBuf>,

    /// Primary icon name (overrides the profile)
    #[arg(long = "primary")]
    pub primary: Option<String>,

    /// Secondary (overlay) icon name (overrides the profile)
    #[arg(long = "secondary")]
    pub secondary: Option<String>,
}

impl StyleArgs {
    fn load(&self) -> Result<StyleProfile> {
        let mut profile = match &self.profile {
            Some(path) => load_profile(path)?,
            None => StyleProfile::default(),
        };
        if let Some(primary) = &self.primary {
            profile.primary.icon = primary.clone();
        }
        if let Some(secondary) = &self.secondary {
            profile.overlay.icon = secondary.clone();
        }
        Ok(profile)
    }

    fn composer(&self) -> Result<IconComposer<'static>> {
        let profile = self.load()?;
        let mut composer = IconComposer::new();
        for name in [&profile.primary.icon, &profile.overlay.icon] {
            if !name.is_empty() && !composer.catalog().contains(name) {
                log::warn!("unknown icon {name:?}, it will not be drawn");
            }
        }
        composer.apply_profile(&profile);
        Ok(composer)
    }
}

fn load_profile(path: &Path) -> Result<StyleProfile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    StyleProfile::from_json(&json)
        .with_context(|| format!("Invalid profile {}", path.display()))
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match args.command {
        Command::List { search } => {
            let composer = IconComposer::new();
            let mut stdout = io::stdout().lock();
            for name in composer.filtered_icons(&search) {
                writeln!(stdout, "{name}")?;
            }
        }
        Command::Svg { style, output } => {
            let svg = style.composer()?.render_svg();
            match output {
                Some(path) => std::fs::write(&path, svg)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => writeln!(io::stdout(), "{svg}")?,
            }
        }
        Command::Png {
            style,
            size,
            output,
        } => {
            if size == 0 {
                anyhow::bail!("PNG size must be greater than zero");
            }
            let png = style.composer()?.render_png(size)?;
            std::fs::write(&output, png)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        Command::Export { style, extra, dir } => {
            let mut composer = style.composer()?;
            composer.profile.export.extra_sizes.extend(extra);
            let mut sink = DirectorySink::create(&dir)?;
            let report = composer.export(&mut sink);
            for file_name in &report.saved {
                log::info!("wrote {}", dir.join(file_name).display());
            }
            if !report.is_complete() {
                anyhow::bail!(
                    "{} of {} artifacts failed to export",
                    report.failed.len(),
                    report.failed.len() + report.saved.len()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_arguments() {
        let args = Args::try_parse_from([
            "exticon", "export", "--primary", "House", "--extra", "256", "--extra", "512", "-d",
            "out",
        ])
        .unwrap();
        match args.command {
            Command::Export { style, extra, dir } => {
                assert_eq!(style.primary.as_deref(), Some("House"));
                assert_eq!(extra, [256, 512]);
                assert_eq!(dir, PathBuf::from("out"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let style = StyleArgs {
            profile: None,
            primary: Some("House".into()),
            secondary: Some("Plus".into()),
        };
        let profile = style.load().unwrap();
        assert_eq!(profile.primary.icon, "House");
        assert_eq!(profile.overlay.icon, "Plus");
        assert_eq!(profile.background.color, "#262626");
    }
}
