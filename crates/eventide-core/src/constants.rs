use chrono::NaiveTime;

/// Hard cap on the number of starts generated for a repeating rule.
pub const REPEAT_MAX: u16 = 200;

/// Time of day a calendar date widens to when used as a lower bound.
pub const START_OF_DAY: NaiveTime = NaiveTime::MIN;

/// Time of day a calendar date widens to when used as an upper bound.
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(time) => time,
    None => panic!("23:59:59 is a valid time of day"),
};
