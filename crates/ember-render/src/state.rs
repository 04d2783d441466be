//! Render-state value descriptors forwarded to the graphics backend.
//!
//! These are plain value objects: the batcher never interprets them, it only
//! hands the active [`PipelineState`] to the device at the start of each
//! flush. The named presets cover the common 2D configurations.

use glam::Mat4;

/// A source/destination blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SourceAlpha,
    InverseSourceAlpha,
    DestinationColor,
    InverseDestinationColor,
}

/// How source fragments are combined with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    pub color_source: BlendFactor,
    pub color_destination: BlendFactor,
    pub alpha_source: BlendFactor,
    pub alpha_destination: BlendFactor,
}

impl BlendState {
    /// No blending; source replaces destination.
    pub const OPAQUE: BlendState = BlendState {
        color_source: BlendFactor::One,
        color_destination: BlendFactor::Zero,
        alpha_source: BlendFactor::One,
        alpha_destination: BlendFactor::Zero,
    };

    /// Premultiplied alpha blending: `src.rgb + dst.rgb * (1 - src.a)`.
    pub const ALPHA_BLEND: BlendState = BlendState {
        color_source: BlendFactor::One,
        color_destination: BlendFactor::InverseSourceAlpha,
        alpha_source: BlendFactor::One,
        alpha_destination: BlendFactor::InverseSourceAlpha,
    };

    /// Straight (non-premultiplied) alpha blending:
    /// `src.rgb * src.a + dst.rgb * (1 - src.a)`.
    pub const NON_PREMULTIPLIED: BlendState = BlendState {
        color_source: BlendFactor::SourceAlpha,
        color_destination: BlendFactor::InverseSourceAlpha,
        alpha_source: BlendFactor::SourceAlpha,
        alpha_destination: BlendFactor::InverseSourceAlpha,
    };

    /// Additive blending for glow and particle effects.
    pub const ADDITIVE: BlendState = BlendState {
        color_source: BlendFactor::SourceAlpha,
        color_destination: BlendFactor::One,
        alpha_source: BlendFactor::SourceAlpha,
        alpha_destination: BlendFactor::One,
    };
}

impl Default for BlendState {
    fn default() -> Self {
        Self::ALPHA_BLEND
    }
}

/// Depth comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Always,
    Never,
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
    NotEqual,
}

/// Depth/stencil configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilState {
    pub depth_enable: bool,
    pub depth_write_enable: bool,
    pub depth_function: CompareFunction,
}

impl DepthStencilState {
    /// Depth testing and writing enabled.
    pub const DEFAULT: DepthStencilState = DepthStencilState {
        depth_enable: true,
        depth_write_enable: true,
        depth_function: CompareFunction::LessEqual,
    };

    /// Depth testing enabled, writing disabled.
    pub const DEPTH_READ: DepthStencilState = DepthStencilState {
        depth_enable: true,
        depth_write_enable: false,
        depth_function: CompareFunction::LessEqual,
    };

    /// Depth disabled entirely; draw order decides visibility.
    pub const NONE: DepthStencilState = DepthStencilState {
        depth_enable: false,
        depth_write_enable: false,
        depth_function: CompareFunction::Always,
    };
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self::NONE
    }
}

/// Triangle culling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Clockwise,
    CounterClockwise,
}

/// Rasterizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterizerState {
    pub cull_mode: CullMode,
    pub scissor_test_enable: bool,
}

impl RasterizerState {
    pub const CULL_NONE: RasterizerState = RasterizerState {
        cull_mode: CullMode::None,
        scissor_test_enable: false,
    };

    pub const CULL_CLOCKWISE: RasterizerState = RasterizerState {
        cull_mode: CullMode::Clockwise,
        scissor_test_enable: false,
    };

    pub const CULL_COUNTER_CLOCKWISE: RasterizerState = RasterizerState {
        cull_mode: CullMode::CounterClockwise,
        scissor_test_enable: false,
    };
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self::CULL_COUNTER_CLOCKWISE
    }
}

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Point,
    Linear,
    Anisotropic,
}

/// Texture coordinate addressing outside the `0.0..=1.0` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureAddressMode {
    Clamp,
    Wrap,
    Mirror,
}

/// Sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerState {
    pub filter: FilterMode,
    pub address_u: TextureAddressMode,
    pub address_v: TextureAddressMode,
}

impl SamplerState {
    pub const POINT_CLAMP: SamplerState = SamplerState {
        filter: FilterMode::Point,
        address_u: TextureAddressMode::Clamp,
        address_v: TextureAddressMode::Clamp,
    };

    pub const POINT_WRAP: SamplerState = SamplerState {
        filter: FilterMode::Point,
        address_u: TextureAddressMode::Wrap,
        address_v: TextureAddressMode::Wrap,
    };

    pub const LINEAR_CLAMP: SamplerState = SamplerState {
        filter: FilterMode::Linear,
        address_u: TextureAddressMode::Clamp,
        address_v: TextureAddressMode::Clamp,
    };

    pub const LINEAR_WRAP: SamplerState = SamplerState {
        filter: FilterMode::Linear,
        address_u: TextureAddressMode::Wrap,
        address_v: TextureAddressMode::Wrap,
    };

    pub const ANISOTROPIC_CLAMP: SamplerState = SamplerState {
        filter: FilterMode::Anisotropic,
        address_u: TextureAddressMode::Clamp,
        address_v: TextureAddressMode::Clamp,
    };
}

impl Default for SamplerState {
    fn default() -> Self {
        Self::LINEAR_CLAMP
    }
}

/// The full render-state selection for one batch, applied once per flush.
///
/// The transform matrix is forwarded alongside the fixed-function state; the
/// backend applies it in whatever shading path it uses for the default pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineState {
    pub blend: BlendState,
    pub sampler: SamplerState,
    pub depth_stencil: DepthStencilState,
    pub rasterizer: RasterizerState,
    pub transform: Mat4,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            blend: BlendState::default(),
            sampler: SamplerState::default(),
            depth_stencil: DepthStencilState::default(),
            rasterizer: RasterizerState::default(),
            transform: Mat4::IDENTITY,
        }
    }
}
