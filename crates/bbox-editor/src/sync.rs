//! Mutation engine: keeps the box store and the render surface in lockstep.
//!
//! Every change to box membership, geometry or labels is a `BoxMutation`
//! applied here, so shape `i` is always the projection of box `i`.

use bbox_core::{Bbox, Bounds, BoxStore, EditorConfig, HostArgs, HostArgsError};
use bbox_render::{Bitmap, ShapeStyle, Surface};

/// A change to the box collection.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxMutation {
    Add(Bbox),
    /// Indices into the pre-removal collection.
    Remove(Vec<usize>),
    ReplaceAll(Vec<Bbox>),
    Relabel { indices: Vec<usize>, label: String },
    SetBounds { index: usize, bounds: Bounds },
}

/// Owns the authoritative store, its surface projection, and the
/// host-supplied initial boxes used by reset.
pub struct SyncEngine {
    pub store: BoxStore,
    pub surface: Surface,
    initial: Vec<Bbox>,
    config: EditorConfig,
}

/// Validated, decoded arguments ready to become a surface.
struct Prepared {
    width: f64,
    height: f64,
    background: Option<Bitmap>,
    boxes: Vec<Bbox>,
    style: ShapeStyle,
    config: EditorConfig,
}

fn prepare(mut args: HostArgs) -> Result<Prepared, HostArgsError> {
    let color = args.validate()?;
    let image = std::mem::take(&mut args.image_data);
    Ok(Prepared {
        width: f64::from(args.canvas_width),
        height: f64::from(args.canvas_height),
        background: Bitmap::decode_or_blank(args.canvas_width, args.canvas_height, image),
        boxes: args.initial_boxes(),
        style: ShapeStyle::new(color, &args.config),
        config: args.config,
    })
}

impl SyncEngine {
    /// Validate host arguments and build the store and surface from them.
    pub fn from_args(args: HostArgs) -> Result<Self, HostArgsError> {
        let p = prepare(args)?;
        let surface = Surface::build(p.width, p.height, p.background, &p.boxes, p.style);
        Ok(Self {
            store: BoxStore::from_boxes(p.boxes.clone()),
            surface,
            initial: p.boxes,
            config: p.config,
        })
    }

    /// Replace everything with a fresh build. Invalid arguments leave the
    /// current state untouched.
    pub fn rebuild(&mut self, args: HostArgs) -> Result<(), HostArgsError> {
        let p = prepare(args)?;
        self.surface
            .rebuild(p.width, p.height, p.background, &p.boxes, p.style);
        self.store.replace_all(p.boxes.clone());
        self.initial = p.boxes;
        self.config = p.config;
        Ok(())
    }

    pub fn initial(&self) -> &[Bbox] {
        &self.initial
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply a mutation to store and surface together. Returns `true` if
    /// the collection changed.
    pub fn apply_mutation(&mut self, mutation: BoxMutation) -> bool {
        match mutation {
            BoxMutation::Add(bbox) => {
                let shape = self.surface.add_shape(&bbox);
                let index = self.store.add(bbox);
                debug_assert_eq!(shape, index);
                true
            }
            BoxMutation::Remove(indices) => {
                let removed = self.store.remove_at(&indices);
                self.surface.remove_shapes(&indices);
                removed
            }
            BoxMutation::ReplaceAll(boxes) => {
                self.surface.replace_shapes(&boxes);
                self.store.replace_all(boxes);
                true
            }
            BoxMutation::Relabel { indices, label } => {
                let touched = self.store.relabel(&indices, &label);
                for &i in &touched {
                    self.surface.set_label(i, &label);
                }
                !touched.is_empty()
            }
            BoxMutation::SetBounds { index, bounds } => {
                // The surface usually holds these bounds already (drag end)
                self.surface.set_bounds(index, bounds);
                self.store.set_bounds(index, bounds)
            }
        }
    }
}
