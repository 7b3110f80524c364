//! Paint and effect codec.
//!
//! Converts the design tool's fill, stroke and effect values into the stable
//! IR shapes. The codec is total over the known kinds: anything else maps to
//! `None` and is dropped by the list helpers.

use figbridge_core::{
    BlendMode, BlurDto, BlurEffect, Effect, EffectDto, EffectList, GradientDto, GradientPaint,
    ImageDto, ImagePaint, Paint, PaintDto, PaintList, ShadowDto, ShadowEffect, SolidDto,
    SolidPaint,
};

const DEFAULT_OPACITY: f64 = 1.0;
const DEFAULT_VISIBLE: bool = true;

/// Serialize one paint, or `None` for kinds without an IR shape.
pub fn serialize_paint(paint: &Paint) -> Option<PaintDto> {
    match paint {
        Paint::Solid(solid) => Some(PaintDto::Solid(solid_dto(solid))),
        Paint::GradientLinear(g) => Some(PaintDto::GradientLinear(gradient_dto(g))),
        Paint::GradientRadial(g) => Some(PaintDto::GradientRadial(gradient_dto(g))),
        Paint::GradientAngular(g) => Some(PaintDto::GradientAngular(gradient_dto(g))),
        Paint::GradientDiamond(g) => Some(PaintDto::GradientDiamond(gradient_dto(g))),
        Paint::Image(image) => Some(PaintDto::Image(image_dto(image))),
        Paint::Unsupported => None,
    }
}

/// Serialize one effect, or `None` for kinds without an IR shape.
pub fn serialize_effect(effect: &Effect) -> Option<EffectDto> {
    match effect {
        Effect::DropShadow(shadow) => Some(EffectDto::DropShadow(shadow_dto(shadow))),
        Effect::InnerShadow(shadow) => Some(EffectDto::InnerShadow(shadow_dto(shadow))),
        Effect::LayerBlur(blur) => Some(EffectDto::LayerBlur(blur_dto(blur))),
        Effect::BackgroundBlur(blur) => Some(EffectDto::BackgroundBlur(blur_dto(blur))),
        Effect::Unsupported => None,
    }
}

/// Serialize a paint list, dropping unsupported kinds.
pub fn serialize_paints(paints: &[Paint]) -> PaintList {
    paints.iter().filter_map(serialize_paint).collect()
}

/// Serialize an effect list, dropping unsupported kinds.
pub fn serialize_effects(effects: &[Effect]) -> EffectList {
    effects.iter().filter_map(serialize_effect).collect()
}

fn solid_dto(paint: &SolidPaint) -> SolidDto {
    SolidDto {
        color: paint.color,
        opacity: paint.opacity.unwrap_or(DEFAULT_OPACITY),
        visible: paint.visible.unwrap_or(DEFAULT_VISIBLE),
    }
}

fn gradient_dto(paint: &GradientPaint) -> GradientDto {
    GradientDto {
        gradient_stops: paint.gradient_stops.clone(),
        gradient_transform: paint.gradient_transform,
        opacity: paint.opacity.unwrap_or(DEFAULT_OPACITY),
        visible: paint.visible.unwrap_or(DEFAULT_VISIBLE),
    }
}

fn image_dto(paint: &ImagePaint) -> ImageDto {
    ImageDto {
        opacity: paint.opacity.unwrap_or(DEFAULT_OPACITY),
        scale_mode: paint.scale_mode.unwrap_or_default(),
        visible: paint.visible.unwrap_or(DEFAULT_VISIBLE),
    }
}

fn shadow_dto(shadow: &ShadowEffect) -> ShadowDto {
    ShadowDto {
        color: shadow.color,
        offset: shadow.offset,
        radius: shadow.radius,
        spread: shadow.spread.unwrap_or(0.0),
        visible: shadow.visible.unwrap_or(DEFAULT_VISIBLE),
        blend_mode: shadow.blend_mode.unwrap_or(BlendMode::Normal),
    }
}

fn blur_dto(blur: &BlurEffect) -> BlurDto {
    BlurDto {
        radius: blur.radius,
        visible: blur.visible.unwrap_or(DEFAULT_VISIBLE),
    }
}
