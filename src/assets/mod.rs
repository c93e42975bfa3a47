//! Asset loader collaborator contract and bounded card asset loading.
//!
//! Network fetching and decoding live outside the crate. Hosts implement
//! [`AssetLoader`]; the carousel only needs each asset's handle and
//! dimensions (or bounds, for models) to build its scene nodes.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use glam::Vec3;

use crate::cards::{CardDescriptor, ResolvedMedia};
use crate::error::LoadError;
use crate::scene::{Aabb, Transform};

/// Opaque renderer-side handle for a loaded texture, video or model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u64);

/// A decoded still image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureAsset {
    /// Renderer handle.
    pub handle: AssetHandle,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// A video ready to play (first frame decodable).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoAsset {
    /// Renderer handle of the video texture.
    pub handle: AssetHandle,
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
}

/// One mesh inside a loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    /// Mesh name from the source file.
    pub name: String,
    /// Local-space bounds of the mesh.
    pub bounds: Aabb,
    /// Transform relative to the model root.
    pub transform: Transform,
}

/// A loaded model, flattened to its meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    /// Renderer handle of the model.
    pub handle: AssetHandle,
    /// Meshes relative to the model root.
    pub meshes: Vec<ModelMesh>,
}

impl ModelAsset {
    /// Model made of a single mesh with the given half extents.
    #[must_use]
    pub fn single_mesh(handle: AssetHandle, half_extents: Vec3) -> Self {
        Self {
            handle,
            meshes: vec![ModelMesh {
                name: "mesh".to_owned(),
                bounds: Aabb::from_half_extents(half_extents),
                transform: Transform::IDENTITY,
            }],
        }
    }
}

/// Async asset loading contract.
///
/// Loads may suspend and may fail; a failure only degrades the card (or
/// shape) that requested it. All methods run on the frame thread, so the
/// futures need not be `Send`.
#[async_trait(?Send)]
pub trait AssetLoader {
    /// Load a still image.
    async fn load_texture(&self, url: &str) -> Result<TextureAsset, LoadError>;

    /// Load a looping, muted video.
    async fn load_video(&self, url: &str) -> Result<VideoAsset, LoadError>;

    /// Load a glTF (or similar) model.
    async fn load_model(&self, url: &str) -> Result<ModelAsset, LoadError>;

    /// Fetch a text document (the Thing JSON).
    async fn fetch_document(&self, url: &str) -> Result<String, LoadError> {
        Err(LoadError::Unsupported(format!("document fetch for {url}")))
    }
}

/// Assets backing one card visual.
#[derive(Debug, Clone, PartialEq)]
pub enum CardAsset {
    /// Stacked textures in source order (failed sources skipped).
    Image(Vec<TextureAsset>),
    /// Video texture.
    Video(VideoAsset),
    /// Chroma-keyed video texture for a camera-facing billboard.
    ChromaVideo(VideoAsset),
    /// Model subtree.
    Model(ModelAsset),
}

/// One loader call.
#[derive(Debug, Clone, Copy)]
enum Request<'a> {
    Texture(&'a str),
    Video(&'a str),
    Model(&'a str),
}

enum Response {
    Texture(TextureAsset),
    Video(VideoAsset),
    Model(ModelAsset),
}

impl Request<'_> {
    fn url(&self) -> &str {
        match *self {
            Self::Texture(url) | Self::Video(url) | Self::Model(url) => url,
        }
    }

    async fn send<L: AssetLoader + ?Sized>(
        self,
        loader: &L,
    ) -> Result<Response, LoadError> {
        match self {
            Self::Texture(url) => {
                loader.load_texture(url).await.map(Response::Texture)
            }
            Self::Video(url) => loader.load_video(url).await.map(Response::Video),
            Self::Model(url) => loader.load_model(url).await.map(Response::Model),
        }
    }
}

/// Loader calls needed by one card, in source order.
fn requests(media: &ResolvedMedia) -> Vec<Request<'_>> {
    match media {
        ResolvedMedia::Image { sources } => {
            sources.iter().map(|url| Request::Texture(url.as_str())).collect()
        }
        ResolvedMedia::Video { source } | ResolvedMedia::ChromaVideo { source } => {
            vec![Request::Video(source)]
        }
        ResolvedMedia::Model { source } => vec![Request::Model(source)],
    }
}

/// Run `requests` with at most `max_concurrent` in flight. Results keep
/// request order.
async fn send_all<L: AssetLoader + ?Sized>(
    loader: &L,
    requests: &[Request<'_>],
    max_concurrent: usize,
) -> Vec<Result<Response, LoadError>> {
    stream::iter(requests.iter().copied())
        .map(|request| request.send(loader))
        .buffered(max_concurrent.max(1))
        .collect()
        .await
}

/// Turn one card's responses into its asset. Image cards keep every
/// source that loaded and fail only when none did.
fn assemble(
    descriptor: &CardDescriptor,
    loaded: Vec<(Request<'_>, Result<Response, LoadError>)>,
) -> Result<CardAsset, LoadError> {
    let mut textures = Vec::new();
    let mut last_error = None;
    for (request, result) in loaded {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::warn!(
                    "card {}: source {} failed: {e}",
                    descriptor.card_id,
                    request.url()
                );
                last_error = Some(e);
                continue;
            }
        };
        match (&descriptor.media, response) {
            (ResolvedMedia::Image { .. }, Response::Texture(texture)) => {
                textures.push(texture);
            }
            (ResolvedMedia::Video { .. }, Response::Video(video)) => {
                return Ok(CardAsset::Video(video));
            }
            (ResolvedMedia::ChromaVideo { .. }, Response::Video(video)) => {
                return Ok(CardAsset::ChromaVideo(video));
            }
            (ResolvedMedia::Model { .. }, Response::Model(model)) => {
                return Ok(CardAsset::Model(model));
            }
            _ => {}
        }
    }
    if textures.is_empty() {
        return Err(last_error.unwrap_or_else(|| {
            LoadError::Unsupported(format!(
                "{} card without a loadable source",
                descriptor.kind().as_str()
            ))
        }));
    }
    Ok(CardAsset::Image(textures))
}

/// Load the assets of one card with at most `max_concurrent` source loads
/// in flight.
pub async fn load_card_asset<L: AssetLoader + ?Sized>(
    loader: &L,
    descriptor: &CardDescriptor,
    max_concurrent: usize,
) -> Result<CardAsset, LoadError> {
    let requests = requests(&descriptor.media);
    let results = send_all(loader, &requests, max_concurrent).await;
    assemble(descriptor, requests.into_iter().zip(results).collect())
}

/// Load every card's assets with at most `max_concurrent` loads in flight
/// across all cards and all of their sources.
///
/// Results come back in descriptor order; one slow or failing card never
/// blocks or aborts the others.
pub async fn load_card_assets<L: AssetLoader + ?Sized>(
    loader: &L,
    descriptors: &[CardDescriptor],
    max_concurrent: usize,
) -> Vec<Result<CardAsset, LoadError>> {
    let per_card: Vec<Vec<Request<'_>>> =
        descriptors.iter().map(|d| requests(&d.media)).collect();
    let flat: Vec<Request<'_>> = per_card.iter().flatten().copied().collect();
    let mut results = send_all(loader, &flat, max_concurrent).await.into_iter();
    descriptors
        .iter()
        .zip(per_card)
        .map(|(descriptor, requests)| {
            let count = requests.len();
            let loaded = requests
                .into_iter()
                .zip(results.by_ref().take(count))
                .collect();
            assemble(descriptor, loaded)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory loader for tests.

    use std::cell::{Cell, RefCell};

    use rustc_hash::FxHashMap;

    use super::{
        async_trait, AssetHandle, AssetLoader, LoadError, ModelAsset,
        TextureAsset, VideoAsset,
    };
    use glam::Vec3;

    /// Serves fixed-size assets; URLs containing `fail` are rejected.
    #[derive(Default)]
    pub(crate) struct FakeLoader {
        pub(crate) sizes: FxHashMap<String, (u32, u32)>,
        pub(crate) documents: FxHashMap<String, String>,
        pub(crate) model_half_extents: Option<Vec3>,
        pub(crate) requests: RefCell<Vec<String>>,
        pub(crate) next_handle: Cell<u64>,
    }

    impl FakeLoader {
        fn handle(&self, url: &str) -> Result<AssetHandle, LoadError> {
            self.requests.borrow_mut().push(url.to_owned());
            if url.contains("fail") {
                return Err(LoadError::Network(format!("404 {url}")));
            }
            let next = self.next_handle.get() + 1;
            self.next_handle.set(next);
            Ok(AssetHandle(next))
        }

        fn size(&self, url: &str) -> (u32, u32) {
            self.sizes.get(url).copied().unwrap_or((800, 600))
        }
    }

    #[async_trait(?Send)]
    impl AssetLoader for FakeLoader {
        async fn load_texture(
            &self,
            url: &str,
        ) -> Result<TextureAsset, LoadError> {
            let handle = self.handle(url)?;
            let (width, height) = self.size(url);
            Ok(TextureAsset {
                handle,
                width,
                height,
            })
        }

        async fn load_video(&self, url: &str) -> Result<VideoAsset, LoadError> {
            let handle = self.handle(url)?;
            let (width, height) = self.size(url);
            Ok(VideoAsset {
                handle,
                width,
                height,
            })
        }

        async fn load_model(&self, url: &str) -> Result<ModelAsset, LoadError> {
            let handle = self.handle(url)?;
            Ok(ModelAsset::single_mesh(
                handle,
                self.model_half_extents.unwrap_or(Vec3::new(2.0, 4.0, 1.0)),
            ))
        }

        async fn fetch_document(&self, url: &str) -> Result<String, LoadError> {
            self.documents
                .get(url)
                .cloned()
                .ok_or_else(|| LoadError::Network(format!("404 {url}")))
        }
    }
}
