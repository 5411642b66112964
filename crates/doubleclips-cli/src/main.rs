//! DoubleClips command-line tools
//!
//! Inspect, plan and edit a `project.timeline` document without the app.

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doubleclips_core::EditSettings;
use doubleclips_timeline::{
    ClipHandle, CompositionPlan, Timeline, TimelineDocument, TrimEdge,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "doubleclips", version, about = "Inspect and edit DoubleClips timelines")]
struct Cli {
    /// Editing limits as JSON (minClipDuration, minKeyframeSpacing, ...).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print tracks, clips and duration.
    Inspect {
        /// Timeline document.
        file: PathBuf,
    },
    /// Print the playback composition plan as JSON.
    Plan {
        /// Timeline document.
        file: PathBuf,
        /// Resolve same-lane overlaps (later clips win).
        #[arg(long, default_value_t = false)]
        flatten: bool,
    },
    /// Split a clip at a timeline time.
    Split {
        file: PathBuf,
        #[command(flatten)]
        target: ClipTarget,
        /// Global split time in seconds.
        #[arg(long)]
        at: f64,
        /// Write here instead of overwriting the input.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Drag a clip edge.
    Trim {
        file: PathBuf,
        #[command(flatten)]
        target: ClipTarget,
        #[arg(long, value_enum)]
        edge: Edge,
        /// Seconds to move the edge; positive moves right.
        #[arg(long, allow_hyphen_values = true)]
        delta: f64,
        /// Write here instead of overwriting the input.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct ClipTarget {
    /// Track position.
    #[arg(long)]
    track: usize,
    /// Clip position within the track.
    #[arg(long)]
    clip: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Edge {
    Left,
    Right,
}

impl From<Edge> for TrimEdge {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Left => TrimEdge::Left,
            Edge::Right => TrimEdge::Right,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => EditSettings::load_from_file(path)
            .with_context(|| format!("read settings '{}'", path.display()))?,
        None => EditSettings::default(),
    };

    match cli.cmd {
        Command::Inspect { file } => cmd_inspect(&load(&file, settings)?),
        Command::Plan { file, flatten } => cmd_plan(&load(&file, settings)?, flatten),
        Command::Split {
            file,
            target,
            at,
            out,
        } => {
            let mut timeline = load(&file, settings)?;
            let handle = resolve(&timeline, &target)?;
            let Some(tail) = timeline.split_clip(handle, at) else {
                bail!("{at}s is not strictly inside track {} clip {}", target.track, target.clip);
            };
            info!(track = tail.track_index, "split clip at {at}s");
            save(timeline, out.as_deref().unwrap_or(file.as_path()))
        }
        Command::Trim {
            file,
            target,
            edge,
            delta,
            out,
        } => {
            let mut timeline = load(&file, settings)?;
            let handle = resolve(&timeline, &target)?;
            let moved = timeline
                .trim_clip(handle, edge.into(), delta)
                .context("clip vanished during trim")?;
            info!(?edge, requested = delta, moved, "trimmed clip");
            save(timeline, out.as_deref().unwrap_or(file.as_path()))
        }
    }
}

fn load(path: &Path, settings: EditSettings) -> Result<Timeline> {
    let doc = TimelineDocument::load_from_file(path)
        .with_context(|| format!("load timeline '{}'", path.display()))?;
    if !doc.repairs.is_clean() {
        info!(repairs = ?doc.repairs, "timeline was repaired on load");
    }
    let mut timeline = doc.into_timeline();
    timeline.set_settings(settings);
    Ok(timeline)
}

fn save(timeline: Timeline, path: &Path) -> Result<()> {
    TimelineDocument::new(timeline)
        .save_to_file(path)
        .with_context(|| format!("write timeline '{}'", path.display()))?;
    info!(path = %path.display(), "wrote timeline");
    Ok(())
}

fn resolve(timeline: &Timeline, target: &ClipTarget) -> Result<ClipHandle> {
    let Some(track) = timeline.track(target.track) else {
        bail!(
            "no track {} (timeline has {})",
            target.track,
            timeline.track_count()
        );
    };
    let Some(clip) = track.clip_at(target.clip) else {
        bail!(
            "no clip {} on track {} (track has {})",
            target.clip,
            target.track,
            track.clip_count()
        );
    };
    Ok(clip.handle())
}

fn cmd_inspect(timeline: &Timeline) -> Result<()> {
    println!(
        "duration {:.3}s, {} tracks, {} clips",
        timeline.duration(),
        timeline.track_count(),
        timeline.clip_count()
    );
    for track in timeline.tracks() {
        println!("track {} (ends {:.3}s)", track.timeline_index(), track.end_time());
        for (i, clip) in track.clips().iter().enumerate() {
            let mut flags = Vec::new();
            if clip.has_audio {
                flags.push("audio");
            }
            if clip.is_mute {
                flags.push("muted");
            }
            if clip.is_reverse {
                flags.push("reverse");
            }
            if clip.keyframes.is_animated() {
                flags.push("animated");
            }
            println!(
                "  [{i}] {:?} '{}' at {} from source {} {}",
                clip.clip_type,
                clip.clip_name,
                clip.timeline_range(),
                clip.source_range(),
                flags.join(",")
            );
        }
    }

    let overlaps = CompositionPlan::build(timeline).overlaps();
    if !overlaps.is_empty() {
        println!("{} overlapping segment pair(s)", overlaps.len());
    }
    Ok(())
}

fn cmd_plan(timeline: &Timeline, flatten: bool) -> Result<()> {
    let mut plan = CompositionPlan::build(timeline);
    if flatten {
        plan = plan.flattened();
    }
    let json = serde_json::to_string_pretty(&plan).context("encode plan")?;
    println!("{json}");
    Ok(())
}
