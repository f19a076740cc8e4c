use std::path::Path;

use anyhow::{Context, Result};

use crate::config::ViewConfig;
use crate::game::Game;
use crate::interpolation::{lerp, sample_chain};
use crate::math::{F, M4, V2, V3};
use crate::node::{Node, Shape};
use crate::texture::{SolidColor, Surface};

/// World units covered by one repetition of the ground texture.
const GROUND_TILE: F = 50.0;

const LAVA: V3 = V3::new(0.35, 0.05, 0.02);
const STONE: V3 = V3::new(0.45, 0.42, 0.4);
const FOOD: V3 = V3::new(1.0, 0.85, 0.1);
const BODY: V3 = V3::new(0.1, 0.6, 0.15);
const SPINE: V3 = V3::new(0.02, 0.25, 0.05);
const HEAD: V3 = V3::new(0.15, 0.8, 0.2);
const EYE: V3 = V3::new(0.95, 0.95, 0.9);

pub fn solid_ground() -> Box<dyn Surface> {
    Box::new(SolidColor(LAVA.expand(1.0)))
}

/// Cycled at runtime, mirrors fill / line / point polygon modes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisplayMode {
    Fill,
    Outline,
    Points,
}

impl DisplayMode {
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Fill => DisplayMode::Outline,
            DisplayMode::Outline => DisplayMode::Points,
            DisplayMode::Points => DisplayMode::Fill,
        }
    }
}

/// RGB float image, row 0 at the bottom.
pub struct Canvas {
    pixels: Vec<V3>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![V3::zero(); width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set(&mut self, position: (i64, i64), color: V3) {
        if position.0 < 0
            || position.1 < 0
            || position.0 >= self.width as i64
            || position.1 >= self.height as i64
        {
            return;
        }
        let index = position.1 as usize * self.width as usize + position.0 as usize;
        self.pixels[index] = color;
    }

    pub fn fill_with<Fc: FnMut(u32, u32) -> V3>(&mut self, mut color: Fc) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.pixels[y as usize * self.width as usize + x as usize] = color(x, y);
            }
        }
    }

    pub fn draw_disc(&mut self, center: V2, radius: F, color: V3, mode: DisplayMode) {
        let (inner, outer) = match mode {
            DisplayMode::Fill => (0.0, radius),
            DisplayMode::Outline => ((radius - 1.0).max(0.0), radius + 0.5),
            DisplayMode::Points => (0.0, 1.5),
        };

        let x_min = (center.x() - outer).floor() as i64;
        let x_max = (center.x() + outer).ceil() as i64;
        let y_min = (center.y() - outer).floor() as i64;
        let y_max = (center.y() + outer).ceil() as i64;

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let dx = x as F + 0.5 - center.x();
                let dy = y as F + 0.5 - center.y();
                let d = (dx * dx + dy * dy).sqrt();
                if d <= outer && d >= inner {
                    self.set((x, y), color);
                }
            }
        }
    }

    /// Gamma encoded RGB8, bottom row first as expected by the texture upload.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let component = |c: F| (c.min(1.0).max(0.0).powf(1.0 / 2.2) * 255.0) as u8;

        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            bytes.push(component(p.x()));
            bytes.push(component(p.y()));
            bytes.push(component(p.z()));
        }
        bytes
    }

    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let pixel_bytes: Vec<u8> = self
            .to_rgb_bytes()
            .chunks(3 * self.width as usize)
            .rev()
            .flatten()
            .copied()
            .collect();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("unable to create {}", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &pixel_bytes,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("unable to save {}", path.display()))?;

        Ok(())
    }
}

/// Top-down orthographic view. World +X is right and world -Z is up.
#[derive(Debug, Clone)]
pub struct View {
    pub center: V3,
    pub extent: F,
    pub follow: F,
}

impl View {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            center: V3::zero(),
            extent: config.extent,
            follow: config.follow,
        }
    }

    /// Eases the view center toward `target`.
    pub fn follow(&mut self, target: V3) {
        self.center = lerp(self.center, target, self.follow);
    }

    pub fn pixels_per_unit(&self, size: (u32, u32)) -> F {
        size.0.min(size.1) as F / self.extent
    }

    pub fn to_pixel(&self, size: (u32, u32), world: V3) -> V2 {
        let scale = self.pixels_per_unit(size);
        V2::new(
            size.0 as F / 2.0 + (world.x() - self.center.x()) * scale,
            size.1 as F / 2.0 - (world.z() - self.center.z()) * scale,
        )
    }

    pub fn to_world(&self, size: (u32, u32), pixel: V2) -> V3 {
        let scale = self.pixels_per_unit(size);
        V3::new(
            self.center.x() + (pixel.x() - size.0 as F / 2.0) / scale,
            0.0,
            self.center.z() - (pixel.y() - size.1 as F / 2.0) / scale,
        )
    }
}

pub struct Renderer {
    canvas: Canvas,
    view: View,
    mode: DisplayMode,
    ground: Box<dyn Surface>,
    spline_tension: F,
    spline_samples: usize,
}

impl Renderer {
    pub fn new(width: u32, height: u32, config: &ViewConfig, ground: Box<dyn Surface>) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            view: View::new(config),
            mode: DisplayMode::Fill,
            ground,
            spline_tension: config.spline_tension,
            spline_samples: config.spline_samples,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn cycle_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn draw(&mut self, game: &Game) {
        self.view.follow(game.agent().position);
        let size = self.canvas.size();
        let scale = self.view.pixels_per_unit(size);

        let view = &self.view;
        let ground = &self.ground;
        self.canvas.fill_with(|x, y| {
            let world = view.to_world(size, V2::new(x as F + 0.5, y as F + 0.5));
            let uv = V2::new(world.x() / GROUND_TILE, world.z() / GROUND_TILE);
            ground.get_f(uv).contract()
        });

        for obstacle in game.obstacles() {
            self.disc(obstacle.center, obstacle.radius * scale, STONE);
        }

        let food = game.food();
        self.disc(food.center, food.radius * scale, FOOD);

        let radius = game.agent().radius;
        let body: Vec<V3> = game.visible_body().collect();
        for &segment in body.iter().rev() {
            self.disc(segment, radius * scale, BODY);
        }

        let mut spine = Vec::with_capacity(body.len() + 1);
        spine.push(game.agent().position);
        spine.extend_from_slice(&body);
        for point in sample_chain(&spine, self.spline_tension, self.spline_samples) {
            let center = self.view.to_pixel(size, point);
            self.canvas
                .draw_disc(center, (radius * scale * 0.2).max(1.0), SPINE, DisplayMode::Fill);
        }

        let head = head_node(radius);
        let mut discs = Vec::new();
        head.visit(game.head_transform(), &mut |node: &Node, world: M4| {
            if let Some(Shape::Disc { radius, color }) = node.shape() {
                let center = world.translation_part();
                let radius = radius * world.transform_vector(V3::new(1.0, 0.0, 0.0)).length();
                discs.push((center, radius, color));
            }
        });
        for (center, radius, color) in discs {
            self.disc(center, radius * scale, color);
        }
    }

    fn disc(&mut self, world: V3, radius: F, color: V3) {
        let center = self.view.to_pixel(self.canvas.size(), world);
        self.canvas.draw_disc(center, radius, color, self.mode);
    }
}

/// Head disc with an eye marker on its local +Z, which the head transform
/// points along the heading.
fn head_node(radius: F) -> Node {
    let mut head = Node::with_shape(Shape::Disc {
        radius,
        color: HEAD,
    });
    let eye = head.add_child(Node::with_shape(Shape::Disc {
        radius: 0.35,
        color: EYE,
    }));
    eye.set_translation(V3::new(0.0, 0.0, radius * 0.6));
    eye.set_scale(V3::fill(radius));
    head
}

#[cfg(test)]
impl Canvas {
    fn get(&self, position: (u32, u32)) -> Option<V3> {
        if position.0 >= self.width || position.1 >= self.height {
            return None;
        }
        Some(self.pixels[position.1 as usize * self.width as usize + position.0 as usize])
    }
}
