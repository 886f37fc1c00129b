use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::Serialize;

use super::digest_model::{DigestFrequency, DigestPreference};
use crate::constants::DIGEST_COOLDOWN_HOURS;

/// Why a user is or is not due a digest. Checks run in declaration order and
/// the first failing one wins.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Eligibility {
    Disabled,
    CoolingDown,
    NotScheduledToday,
    DailyRequiresPro,
    Eligible,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

pub fn evaluate_eligibility(
    preference: &DigestPreference,
    is_pro: bool,
    now: DateTime<Utc>,
    weekly_day: Weekday,
) -> Eligibility {
    if !preference.digest_enabled {
        return Eligibility::Disabled;
    }

    if let Some(last_sent) = preference.last_sent_at {
        let elapsed = now.naive_utc() - last_sent;
        if elapsed < Duration::hours(DIGEST_COOLDOWN_HOURS) {
            return Eligibility::CoolingDown;
        }
    }

    if preference.digest_frequency == DigestFrequency::Weekly && now.weekday() != weekly_day {
        return Eligibility::NotScheduledToday;
    }

    // Free users may receive their first daily digest, never a second.
    if preference.digest_frequency == DigestFrequency::Daily
        && !is_pro
        && preference.last_sent_at.is_some()
    {
        return Eligibility::DailyRequiresPro;
    }

    Eligibility::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // 2024-01-08 is a Monday.
    fn monday_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, 0).unwrap()
    }

    fn pref(frequency: DigestFrequency, last_sent_hours_ago: Option<i64>) -> DigestPreference {
        DigestPreference {
            user_id: "u1".to_string(),
            digest_enabled: true,
            digest_frequency: frequency,
            last_sent_at: last_sent_hours_ago
                .map(|h| (monday_noon() - Duration::hours(h)).naive_utc()),
        }
    }

    #[test]
    fn test_disabled_wins_over_everything() {
        let mut p = pref(DigestFrequency::Daily, Some(1));
        p.digest_enabled = false;
        assert_eq!(
            evaluate_eligibility(&p, true, monday_noon(), Weekday::Mon),
            Eligibility::Disabled
        );
    }

    #[test]
    fn test_cooldown() {
        let p = pref(DigestFrequency::Daily, Some(19));
        assert_eq!(
            evaluate_eligibility(&p, true, monday_noon(), Weekday::Mon),
            Eligibility::CoolingDown
        );
        let p = pref(DigestFrequency::Daily, Some(20));
        assert_eq!(
            evaluate_eligibility(&p, true, monday_noon(), Weekday::Mon),
            Eligibility::Eligible
        );
    }

    #[test]
    fn test_weekly_only_on_configured_day() {
        let p = pref(DigestFrequency::Weekly, None);
        assert_eq!(
            evaluate_eligibility(&p, false, monday_noon(), Weekday::Mon),
            Eligibility::Eligible
        );
        assert_eq!(
            evaluate_eligibility(&p, false, monday_noon(), Weekday::Fri),
            Eligibility::NotScheduledToday
        );
    }

    #[test]
    fn test_cooldown_checked_before_schedule() {
        let p = pref(DigestFrequency::Weekly, Some(2));
        assert_eq!(
            evaluate_eligibility(&p, false, monday_noon(), Weekday::Fri),
            Eligibility::CoolingDown
        );
    }

    #[test]
    fn test_daily_free_first_digest_only() {
        let never_sent = pref(DigestFrequency::Daily, None);
        assert_eq!(
            evaluate_eligibility(&never_sent, false, monday_noon(), Weekday::Mon),
            Eligibility::Eligible
        );

        let sent_before = pref(DigestFrequency::Daily, Some(48));
        assert_eq!(
            evaluate_eligibility(&sent_before, false, monday_noon(), Weekday::Mon),
            Eligibility::DailyRequiresPro
        );
        assert_eq!(
            evaluate_eligibility(&sent_before, true, monday_noon(), Weekday::Mon),
            Eligibility::Eligible
        );
    }
}
