//! Headless carousel runner.
//!
//! Loads a Thing document from a file or URL, builds the carousel without
//! decoding any media, plays the reveal at a fixed frame rate and logs the
//! resulting layout and a pick at the requested screen point.

// Everything runs on the main thread under `pollster`.
#![allow(clippy::future_not_send)]

use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use glam::{Vec2, Vec3};
use ring_carousel::assets::{
    AssetHandle, AssetLoader, ModelAsset, TextureAsset, VideoAsset,
};
use ring_carousel::camera::Camera;
use ring_carousel::carousel::Renderer;
use ring_carousel::error::LoadError;
use ring_carousel::options::CarouselOptions;
use ring_carousel::scene::SceneGraph;
use ring_carousel::thing::Thing;
use ring_carousel::{Carousel, CarouselError};

/// Upper bound on simulated frames, so a stuck transition cannot hang.
const MAX_FRAMES: u32 = 10_000;

#[derive(Parser, Debug)]
#[command(version, about = "Play a ring carousel reveal headlessly")]
struct Args {
    /// Thing document: a local JSON file or an http(s) URL.
    thing: String,

    /// TOML options preset.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Pick point in normalized device coordinates.
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
    pick: Option<Vec<f32>>,
}

/// Hands out asset handles without downloading media. Documents are
/// fetched over HTTP.
#[derive(Default)]
struct HeadlessLoader {
    next_handle: Cell<u64>,
}

impl HeadlessLoader {
    fn handle(&self) -> AssetHandle {
        let next = self.next_handle.get() + 1;
        self.next_handle.set(next);
        AssetHandle(next)
    }
}

#[async_trait(?Send)]
impl AssetLoader for HeadlessLoader {
    async fn load_texture(&self, url: &str) -> Result<TextureAsset, LoadError> {
        log::debug!("texture {url}");
        Ok(TextureAsset {
            handle: self.handle(),
            width: 0,
            height: 0,
        })
    }

    async fn load_video(&self, url: &str) -> Result<VideoAsset, LoadError> {
        log::debug!("video {url}");
        Ok(VideoAsset {
            handle: self.handle(),
            width: 0,
            height: 0,
        })
    }

    async fn load_model(&self, url: &str) -> Result<ModelAsset, LoadError> {
        log::debug!("model {url}");
        Ok(ModelAsset::single_mesh(self.handle(), Vec3::ONE))
    }

    async fn fetch_document(&self, url: &str) -> Result<String, LoadError> {
        ureq::get(url)
            .call()
            .map_err(|e| LoadError::Network(e.to_string()))?
            .into_body()
            .read_to_string()
            .map_err(|e| LoadError::Decode(e.to_string()))
    }
}

struct NullRenderer;

impl Renderer for NullRenderer {
    fn set_clear_color(&mut self, rgb: [f32; 3], alpha: f32) {
        log::debug!("clear color {rgb:?} alpha {alpha}");
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();
    match pollster::block_on(run(&args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), CarouselError> {
    let options = match &args.options {
        Some(path) => CarouselOptions::load(path)?,
        None => CarouselOptions::default(),
    };

    let loader = HeadlessLoader::default();
    let thing = if args.thing.starts_with("http://")
        || args.thing.starts_with("https://")
    {
        Thing::fetch(&loader, &args.thing).await?
    } else {
        Thing::from_json(&std::fs::read_to_string(&args.thing)?)?
    };

    let mut carousel = Carousel::new(
        thing,
        NullRenderer,
        SceneGraph::new(),
        Camera::default(),
        loader,
        options,
    );
    carousel.init().await?;

    let layout = carousel.layout();
    log::info!(
        "{} cards on a ring of radius {:.3}",
        layout.len(),
        layout.radius
    );
    for (descriptor, angle) in
        carousel.registry().descriptors().iter().zip(&layout.angles)
    {
        log::info!(
            "  #{} {} {} at {:.1}°",
            descriptor.index,
            descriptor.kind().as_str(),
            descriptor.card_id,
            angle.to_degrees()
        );
    }

    carousel.start_animation()?;
    let frame = Duration::from_secs(1) / args.fps.max(1);
    let mut frames = 0;
    while carousel.is_animating() && frames < MAX_FRAMES {
        carousel.update_with_elapsed(frame);
        frames += 1;
    }
    carousel.update_with_elapsed(frame);
    log::info!(
        "{} after {frames} frames ({:.2}s)",
        carousel.state(),
        (frame * frames).as_secs_f32()
    );

    let point = args
        .pick
        .as_deref()
        .map_or(Vec2::ZERO, |p| Vec2::new(p[0], p[1]));
    match carousel.get_object_data_at_point(point) {
        Some(hit) => log::info!(
            "pick {point}: {:?} at distance {:.2}",
            hit.target,
            hit.distance
        ),
        None => log::info!("pick {point}: nothing"),
    }

    carousel.dispose();
    Ok(())
}
