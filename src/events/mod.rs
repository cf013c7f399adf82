mod event;
mod sink;

pub use event::{
    Event, PayloadFilterApplied, PayloadModeChanged, PayloadNodeDragEnd, PayloadNodeDragStart,
    PayloadNodeExpandToggle, PayloadNodeHoverEnter, PayloadNodeHoverLeave, PayloadSettled,
};

pub use sink::EventSink;
