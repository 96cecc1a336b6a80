use std::path::PathBuf;

use crate::concat::SortMethod;
use crate::overlay::Position;
use crate::samples::SampleKind;

#[derive(Debug, clap::Parser)]
#[clap(version, about = "Folder concatenation and image overlay, driven by ffmpeg")]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Concatenate every .mp4 in a folder into a single video
    Concatenate(ConcatArgs),
    /// Composite a still image on top of a video
    Overlay(OverlayArgs),
    /// Generate sample videos or images for trying out the other commands
    Samples(SamplesArgs),
}

#[derive(Debug, clap::Args)]
pub struct ConcatArgs {
    /// The folder containing the .mp4 files to merge
    #[clap(help_heading = "INPUT")]
    pub folder: PathBuf,

    /// The path to which to write the merged video (default: output/<folder-name>.mp4)
    #[clap(long, short = 'o', help_heading = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// The order in which the files are concatenated
    #[clap(long, short = 's', value_enum, default_value = "alphabetical")]
    pub sort: SortMethod,
}

#[derive(Debug, clap::Args)]
pub struct OverlayArgs {
    /// The base video file
    #[clap(help_heading = "INPUT")]
    pub video: PathBuf,

    /// The image to composite on top of the video
    #[clap(help_heading = "INPUT")]
    pub image: PathBuf,

    /// The path to which to write the composited video (default: output/<video>_overlay.<ext>)
    #[clap(long, short = 'o', help_heading = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Where on the frame to place the image
    #[clap(long, short = 'p', value_enum, default_value = "top-right")]
    pub position: Position,

    /// Scale the image before compositing ("100:100", "50%", "iw*0.5:ih*0.5")
    #[clap(long, short = 's')]
    pub scale: Option<String>,

    /// Opacity of the image, from 0.0 (invisible) to 1.0 (opaque)
    #[clap(long, default_value_t = 1.0)]
    pub opacity: f64,

    /// X margin from the frame edge, or the absolute X for --position custom
    #[clap(long)]
    pub offset_x: Option<i64>,

    /// Y margin from the frame edge, or the absolute Y for --position custom
    #[clap(long)]
    pub offset_y: Option<i64>,

    /// When the image first appears (HH:MM:SS; default: the start of the video)
    #[clap(long)]
    pub start_time: Option<String>,

    /// How long the image stays visible (HH:MM:SS; default: the rest of the video)
    #[clap(long)]
    pub duration: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct SamplesArgs {
    /// Which fixture set to generate
    #[clap(value_enum)]
    pub kind: SampleKind,

    /// Where to put the generated files (default: test_videos/ or test_images/)
    #[clap(long)]
    pub dir: Option<PathBuf>,
}
