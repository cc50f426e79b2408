// Date/time helpers shared by the engine and whatever renders its output.
use chrono::{DateTime, FixedOffset, NaiveTime};

/// The same local calendar day as `reference`, at `time`, in `reference`'s offset.
pub fn at_time_of_day(reference: &DateTime<FixedOffset>, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
    reference
        .date_naive()
        .and_time(time)
        .and_local_timezone(*reference.offset())
        .single()
}
