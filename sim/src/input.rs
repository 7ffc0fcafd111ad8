//! Level-triggered input state read once per tick.
//!
//! Directional flags only reflect what is held right now; nothing is queued.
//! Pointer clicks are the one exception: a click or tap is kept until the next
//! tick consumes it.

use nalgebra::Vector2;

/// One of the four cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

impl Direction {
    /// Evaluation order used by the movement controller. The last held
    /// direction in this order decides the facing.
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];
}

/// Currently held directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    #[inline]
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Forward => self.forward = held,
            Direction::Back => self.back = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    #[inline]
    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Back => self.back,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }

    /// Release everything (focus loss).
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Where a pointer event came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// Pointer position in normalized device coordinates plus the click bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    /// Last known position, `[-1, 1]` on both axes, +Y up.
    pub ndc: Vector2<f32>,
    pub source: PointerSource,
    /// Set by a tap; the next mouse click is the platform's synthetic echo and is dropped.
    swallow_next_click: bool,
    /// Click waiting to be resolved by the next tick.
    pending_click: Option<Vector2<f32>>,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            ndc: Vector2::zeros(),
            source: PointerSource::default(),
            swallow_next_click: false,
            pending_click: None,
        }
    }
}

impl PointerState {
    /// Record a pointer move. Coordinates are clamped into NDC range.
    pub fn move_to(&mut self, ndc: Vector2<f32>, source: PointerSource) {
        self.ndc = Vector2::new(ndc.x.clamp(-1.0, 1.0), ndc.y.clamp(-1.0, 1.0));
        self.source = source;
    }

    /// Register a mouse click at `ndc`.
    ///
    /// Returns `false` when the click was swallowed as the echo of a preceding tap.
    pub fn click(&mut self, ndc: Vector2<f32>) -> bool {
        if self.swallow_next_click {
            self.swallow_next_click = false;
            return false;
        }
        self.move_to(ndc, PointerSource::Mouse);
        self.pending_click = Some(self.ndc);
        true
    }

    /// Register a touch tap at `ndc`; arms the one-shot click guard.
    pub fn tap(&mut self, ndc: Vector2<f32>) {
        self.move_to(ndc, PointerSource::Touch);
        self.pending_click = Some(self.ndc);
        self.swallow_next_click = true;
    }

    /// Take the click waiting for this tick, if any.
    #[inline]
    pub fn take_click(&mut self) -> Option<Vector2<f32>> {
        self.pending_click.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_releases_every_direction() {
        let mut input = InputState::default();
        for direction in Direction::ALL {
            input.set(direction, true);
            assert!(input.is_held(direction));
        }

        input.clear();

        assert!(!input.any());
    }

    #[test]
    fn click_after_tap_is_swallowed_exactly_once() {
        let mut pointer = PointerState::default();
        let at = Vector2::new(0.25, -0.5);

        pointer.tap(at);
        assert_eq!(pointer.take_click(), Some(at));

        assert!(!pointer.click(at));
        assert_eq!(pointer.take_click(), None);

        assert!(pointer.click(at));
        assert_eq!(pointer.take_click(), Some(at));
    }

    #[test]
    fn plain_clicks_are_never_swallowed() {
        let mut pointer = PointerState::default();

        assert!(pointer.click(Vector2::new(0.0, 0.0)));
        assert!(pointer.click(Vector2::new(0.1, 0.1)));
        assert_eq!(pointer.take_click(), Some(Vector2::new(0.1, 0.1)));
    }

    #[test]
    fn moves_are_clamped_to_ndc() {
        let mut pointer = PointerState::default();

        pointer.move_to(Vector2::new(3.0, -7.0), PointerSource::Touch);

        assert_eq!(pointer.ndc, Vector2::new(1.0, -1.0));
        assert_eq!(pointer.source, PointerSource::Touch);
    }
}
