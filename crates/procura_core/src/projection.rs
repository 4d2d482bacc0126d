use crate::classify::ClassifiedEvent;

/// Everything the UI knows about one stream, derived purely from the events
/// seen so far.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamProjection {
    pub messages: Vec<String>,
    pub scout_count: Option<u32>,
    pub final_price: Option<f64>,
    pub completed: bool,
    pub selected_model: Option<String>,
}

impl StreamProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = ClassifiedEvent>,
    {
        events.into_iter().fold(Self::default(), apply)
    }

    /// Append a client-side notice (not from the stream) to the display log.
    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }
}

/// Fold one event into the projection.
///
/// Scalars are last-write-wins, `completed` never goes back to false and the
/// display log is append-only.
pub fn apply(mut projection: StreamProjection, event: ClassifiedEvent) -> StreamProjection {
    match event {
        ClassifiedEvent::Model { name } => projection.selected_model = Some(name),
        ClassifiedEvent::ScoutCount { count } => projection.scout_count = Some(count),
        ClassifiedEvent::NegotiationResult { final_unit } => {
            projection.final_price = Some(final_unit)
        }
        ClassifiedEvent::Done => projection.completed = true,
        ClassifiedEvent::Log { text } => projection.messages.push(text),
    }
    projection
}
