mod ffmpeg_toolkit;

pub use ffmpeg_toolkit::FfmpegToolkit;
