// Print what the remixer sees in a set of media files

use std::path::PathBuf;

use clap::Parser;

use clip_remixer::{
    audio::AudioLoader,
    config::ToolsConfig,
    tools::FfmpegTools,
    video::VideoLoader,
};

#[derive(Parser)]
#[command(name = "probe_media", about = "Show probed metadata for video and audio files")]
struct Args {
    /// Files to inspect
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let tools = FfmpegTools::new(&ToolsConfig::default());
    let ffmpeg_ok = tools.probe().await.is_ok();
    if !ffmpeg_ok {
        println!("FFmpeg not available, only audio files can be inspected");
    }
    let loader = VideoLoader::new(tools);

    for path in &args.files {
        println!("{}", path.display());

        if ffmpeg_ok {
            match loader.load(path).await {
                Ok(video) => {
                    println!("   video: {}x{} @ {:.3} fps", video.width, video.height, video.fps);
                    println!("   duration: {:.3}s, audio stream: {}", video.duration, video.has_audio);
                    continue;
                }
                Err(e) => println!("   not a video: {}", e),
            }
        }

        match AudioLoader::load(path).await {
            Ok(audio) => {
                println!("   audio: {:.3}s", audio.duration);
                if let Some(rate) = audio.sample_rate {
                    println!("   sample rate: {} Hz", rate);
                }
                if let Some(channels) = audio.channels {
                    println!("   channels: {}", channels);
                }
                if let Some(codec) = &audio.format.codec {
                    println!("   codec: {}", codec);
                }
            }
            Err(e) => println!("   not readable: {}", e),
        }
    }

    Ok(())
}
