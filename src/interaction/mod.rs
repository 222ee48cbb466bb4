//! Direct-manipulation interaction: hit testing, drag sessions, selection
//! gating, autoscroll, touch and keyboard navigation.

pub mod autoscroll;
pub mod handlers;
pub mod keyboard;
pub mod selection;
pub mod session;
pub mod throttle;
pub mod touch;

pub use autoscroll::{AutoScrollEdgeDetector, ScrollDirection};
pub use hit_test::{CursorKind, HitContext, HitTester, RegionTag};
pub use keyboard::{Direction, KeyboardNavigator, NavigationOutcome};
pub use selection::{SelectionModel, SelectionOutcome, SelectionRequest};
pub use session::{
    Commit, DragContext, DragHandler, DragMode, DragSession, DragSessionController, DragTarget,
    Preview, TransientGuard,
};
pub use throttle::Throttle;
pub use touch::{TouchGestureAdapter, TouchResponse};
