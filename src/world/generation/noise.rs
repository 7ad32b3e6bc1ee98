//! Chunked noise field generator
//!
//! Samples a fractal noise field in independent rectangular chunks on the
//! rayon pool, merges them by coordinate and classifies every cell into a
//! biome. Sampling is a pure function of the coordinate, so the field does
//! not depend on chunk size or the order chunks finish in.

use fastnoise_lite::{
    CellularDistanceFunction, CellularReturnType, DomainWarpType, FastNoiseLite, FractalType, NoiseType,
};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::biomes::{BiomeMap, BiomeThresholds};
use super::cancel::CancelToken;
use super::partition::Rect;
use super::{place_tile_at, ProceduralGenerator};
use crate::error::GenerationError;
use crate::world::GridSink;

/// Base noise algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseKind {
    #[default]
    OpenSimplex2,
    OpenSimplex2S,
    Cellular,
    Perlin,
    ValueCubic,
    Value,
}

/// Octave combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FractalKind {
    None,
    #[default]
    FBm,
    Ridged,
    PingPong,
    DomainWarpProgressive,
    DomainWarpIndependent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainWarpKind {
    OpenSimplex2,
    OpenSimplex2Reduced,
    BasicGrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellularDistance {
    #[default]
    Euclidean,
    EuclideanSq,
    Manhattan,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellularReturn {
    CellValue,
    #[default]
    Distance,
    Distance2,
    Distance2Add,
    Distance2Sub,
    Distance2Mul,
    Distance2Div,
}

impl From<NoiseKind> for NoiseType {
    fn from(kind: NoiseKind) -> Self {
        match kind {
            NoiseKind::OpenSimplex2 => NoiseType::OpenSimplex2,
            NoiseKind::OpenSimplex2S => NoiseType::OpenSimplex2S,
            NoiseKind::Cellular => NoiseType::Cellular,
            NoiseKind::Perlin => NoiseType::Perlin,
            NoiseKind::ValueCubic => NoiseType::ValueCubic,
            NoiseKind::Value => NoiseType::Value,
        }
    }
}

impl From<FractalKind> for FractalType {
    fn from(kind: FractalKind) -> Self {
        match kind {
            FractalKind::None => FractalType::None,
            FractalKind::FBm => FractalType::FBm,
            FractalKind::Ridged => FractalType::Ridged,
            FractalKind::PingPong => FractalType::PingPong,
            FractalKind::DomainWarpProgressive => FractalType::DomainWarpProgressive,
            FractalKind::DomainWarpIndependent => FractalType::DomainWarpIndependent,
        }
    }
}

impl From<DomainWarpKind> for DomainWarpType {
    fn from(kind: DomainWarpKind) -> Self {
        match kind {
            DomainWarpKind::OpenSimplex2 => DomainWarpType::OpenSimplex2,
            DomainWarpKind::OpenSimplex2Reduced => DomainWarpType::OpenSimplex2Reduced,
            DomainWarpKind::BasicGrid => DomainWarpType::BasicGrid,
        }
    }
}

impl From<CellularDistance> for CellularDistanceFunction {
    fn from(kind: CellularDistance) -> Self {
        match kind {
            CellularDistance::Euclidean => CellularDistanceFunction::Euclidean,
            CellularDistance::EuclideanSq => CellularDistanceFunction::EuclideanSq,
            CellularDistance::Manhattan => CellularDistanceFunction::Manhattan,
            CellularDistance::Hybrid => CellularDistanceFunction::Hybrid,
        }
    }
}

impl From<CellularReturn> for CellularReturnType {
    fn from(kind: CellularReturn) -> Self {
        match kind {
            CellularReturn::CellValue => CellularReturnType::CellValue,
            CellularReturn::Distance => CellularReturnType::Distance,
            CellularReturn::Distance2 => CellularReturnType::Distance2,
            CellularReturn::Distance2Add => CellularReturnType::Distance2Add,
            CellularReturn::Distance2Sub => CellularReturnType::Distance2Sub,
            CellularReturn::Distance2Mul => CellularReturnType::Distance2Mul,
            CellularReturn::Distance2Div => CellularReturnType::Distance2Div,
        }
    }
}

/// Shape of the fractal noise function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub seed: i32,
    pub frequency: f32,
    pub noise_type: NoiseKind,
    pub fractal_type: FractalKind,
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
    pub weighted_strength: f32,
    pub ping_pong_strength: f32,
    /// Warp sample coordinates before evaluating. `None` samples unwarped.
    pub domain_warp_type: Option<DomainWarpKind>,
    pub domain_warp_amp: f32,
    pub cellular_distance_function: CellularDistance,
    pub cellular_return_type: CellularReturn,
    pub cellular_jitter: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 0.05,
            noise_type: NoiseKind::OpenSimplex2,
            fractal_type: FractalKind::FBm,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            weighted_strength: 0.0,
            ping_pong_strength: 2.0,
            domain_warp_type: None,
            domain_warp_amp: 1.0,
            cellular_distance_function: CellularDistance::Euclidean,
            cellular_return_type: CellularReturn::Distance,
            cellular_jitter: 1.0,
        }
    }
}

impl NoiseParams {
    fn build(&self) -> FastNoiseLite {
        let mut fnl = FastNoiseLite::with_seed(self.seed);
        fnl.set_frequency(Some(self.frequency));
        fnl.set_noise_type(Some(self.noise_type.into()));
        fnl.set_fractal_type(Some(self.fractal_type.into()));
        fnl.set_fractal_octaves(Some(self.octaves));
        fnl.set_fractal_lacunarity(Some(self.lacunarity));
        fnl.set_fractal_gain(Some(self.gain));
        fnl.set_fractal_weighted_strength(Some(self.weighted_strength));
        fnl.set_fractal_ping_pong_strength(Some(self.ping_pong_strength));
        fnl.set_cellular_distance_function(Some(self.cellular_distance_function.into()));
        fnl.set_cellular_return_type(Some(self.cellular_return_type.into()));
        fnl.set_cellular_jitter(Some(self.cellular_jitter));
        if let Some(warp) = self.domain_warp_type {
            fnl.set_domain_warp_type(Some(warp.into()));
        }
        fnl.set_domain_warp_amp(Some(self.domain_warp_amp));
        fnl
    }
}

/// Seeded once per field and shared read-only by every chunk
pub struct NoiseSampler {
    fnl: FastNoiseLite,
    warp: bool,
}

impl NoiseSampler {
    pub fn new(params: &NoiseParams) -> Self {
        Self {
            fnl: params.build(),
            warp: params.domain_warp_type.is_some(),
        }
    }

    /// Noise at a grid coordinate, clamped to `[-1, 1]`
    pub fn sample(&self, x: i32, y: i32) -> f32 {
        let (mut sx, mut sy) = (x as f32, y as f32);
        if self.warp {
            (sx, sy) = self.fnl.domain_warp_2d(sx, sy);
        }
        self.fnl.get_noise_2d(sx, sy).clamp(-1.0, 1.0)
    }
}

/// Settings for the noise field strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub width: i32,
    pub height: i32,
    /// Side length of one sampling chunk
    pub chunk_size: i32,
    pub noise: NoiseParams,
    pub thresholds: BiomeThresholds,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            chunk_size: 32,
            noise: NoiseParams::default(),
            thresholds: BiomeThresholds::default(),
        }
    }
}

impl NoiseSettings {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.chunk_size < 1 {
            return Err(GenerationError::InvalidConfig(format!(
                "chunk_size must be at least 1, got {}",
                self.chunk_size
            )));
        }
        if self.width < 0 || self.height < 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "noise extent must not be negative, got {}x{}",
                self.width, self.height
            )));
        }
        if self.noise.octaves < 1 {
            return Err(GenerationError::InvalidConfig(format!(
                "octaves must be at least 1, got {}",
                self.noise.octaves
            )));
        }
        self.thresholds.validate()
    }
}

/// Split `width x height` into chunks of at most `chunk_size` square.
/// Chunks are listed column by column; edge chunks are smaller.
pub fn chunk_regions(width: i32, height: i32, chunk_size: i32) -> Vec<Rect> {
    let step = chunk_size.max(1) as usize;
    let mut regions = Vec::new();
    for x in (0..width.max(0)).step_by(step) {
        for y in (0..height.max(0)).step_by(step) {
            let w = chunk_size.min(width - x);
            let h = chunk_size.min(height - y);
            regions.push(Rect::new(x, y, w, h));
        }
    }
    regions
}

/// Samples of one chunk, row-major within the chunk
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseChunk {
    pub region: Rect,
    pub values: Vec<f32>,
}

impl NoiseChunk {
    pub fn sample(sampler: &NoiseSampler, region: Rect) -> Self {
        let values = region.cells().map(|p| sampler.sample(p.x, p.y)).collect();
        Self { region, values }
    }
}

/// Dense scalar field, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField {
    pub width: i32,
    pub height: i32,
    pub values: Vec<f32>,
}

impl NoiseField {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            values: vec![0.0; (width * height) as usize],
        }
    }

    #[inline]
    fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some(self.values[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    /// Copy a chunk into place. Chunks never overlap, so merge order is irrelevant.
    pub fn merge_chunk(&mut self, chunk: &NoiseChunk) {
        for (pos, value) in chunk.region.cells().zip(&chunk.values) {
            if pos.x < self.width && pos.y < self.height {
                let idx = self.xy_to_idx(pos.x, pos.y);
                self.values[idx] = *value;
            }
        }
    }

    pub fn classify(&self, thresholds: &BiomeThresholds) -> BiomeMap {
        BiomeMap {
            width: self.width,
            height: self.height,
            tiles: self.values.iter().map(|&v| thresholds.classify_noise(v)).collect(),
        }
    }
}

/// Sample the whole field, one rayon task per chunk.
///
/// Cancellation is checked before each chunk starts; a cancelled run
/// returns without merging anything.
pub fn sample_field(settings: &NoiseSettings, cancel: &CancelToken) -> Result<NoiseField, GenerationError> {
    let sampler = NoiseSampler::new(&settings.noise);
    let regions = chunk_regions(settings.width, settings.height, settings.chunk_size);
    debug!(
        "Sampling {}x{} noise in {} chunks of {}",
        settings.width,
        settings.height,
        regions.len(),
        settings.chunk_size
    );

    let chunks: Option<Vec<NoiseChunk>> = regions
        .par_iter()
        .map(|&region| {
            if cancel.is_cancelled() {
                None
            } else {
                Some(NoiseChunk::sample(&sampler, region))
            }
        })
        .collect();
    let chunks = chunks.ok_or(GenerationError::Cancelled)?;
    if cancel.is_cancelled() {
        return Err(GenerationError::Cancelled);
    }

    let mut field = NoiseField::new(settings.width, settings.height);
    for chunk in &chunks {
        field.merge_chunk(chunk);
    }
    Ok(field)
}

/// Noise biome strategy
pub struct NoiseFieldGenerator {
    settings: NoiseSettings,
    field: Option<NoiseField>,
    biomes: Option<BiomeMap>,
}

impl NoiseFieldGenerator {
    pub fn new(settings: NoiseSettings) -> Self {
        Self {
            settings,
            field: None,
            biomes: None,
        }
    }

    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Scalar field of the last completed run
    pub fn field(&self) -> Option<&NoiseField> {
        self.field.as_ref()
    }

    /// Biome labels of the last completed run
    pub fn biomes(&self) -> Option<&BiomeMap> {
        self.biomes.as_ref()
    }
}

impl ProceduralGenerator for NoiseFieldGenerator {
    fn name(&self) -> &'static str {
        "noise field"
    }

    fn generate(&mut self, grid: &mut dyn GridSink, cancel: &CancelToken) -> Result<(), GenerationError> {
        self.field = None;
        self.biomes = None;
        info!(
            "Noise field over {}x{} (seed={}, {:?}/{:?}, {} octaves)",
            self.settings.width,
            self.settings.height,
            self.settings.noise.seed,
            self.settings.noise.noise_type,
            self.settings.noise.fractal_type,
            self.settings.noise.octaves
        );

        let field = sample_field(&self.settings, cancel)?;
        let biomes = field.classify(&self.settings.thresholds);

        for y in 0..biomes.height {
            if cancel.is_cancelled() {
                return Err(GenerationError::Cancelled);
            }
            for x in 0..biomes.width {
                if let Some(tile) = biomes.get(x, y) {
                    place_tile_at(grid, x, y, tile);
                }
            }
        }

        let [water, sand, grass, rock, highland] = biomes.histogram();
        info!(
            "Noise field classified: water={} sand={} grass={} rock={} highland={}",
            water, sand, grass, rock, highland
        );
        self.field = Some(field);
        self.biomes = Some(biomes);
        Ok(())
    }
}
