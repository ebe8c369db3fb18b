//! Injury outcome breakdown by sex.

use collision_dash_analytics_models::GenderInjuryCounts;
use collision_dash_collision_models::{CrashRecord, PersonInjury, PersonSex};

/// Sexes shown in the breakdown, in display order.
pub const GENDER_ORDER: &[PersonSex] = &[PersonSex::F, PersonSex::M];

/// Uninjured/injured/killed counts for each of [`GENDER_ORDER`].
///
/// Counts come from the per-person injury outcome. Where no person of that
/// sex has a category recorded, the figure falls back to the crash-level
/// sums: injured to `persons_injured`, killed to `persons_killed`,
/// uninjured to whatever remains of the row count. Sexes whose three counts are all zero are
/// omitted.
pub fn gender_breakdown<'r>(
    records: impl IntoIterator<Item = &'r CrashRecord> + Clone,
) -> Vec<GenderInjuryCounts> {
    GENDER_ORDER
        .iter()
        .filter_map(|&sex| {
            let counts = counts_for(records.clone(), sex);
            if counts.uninjured == 0 && counts.injured == 0 && counts.killed == 0 {
                log::debug!("No injury data for sex {sex}, omitting");
                None
            } else {
                Some(counts)
            }
        })
        .collect()
}

#[derive(Default)]
struct Tally {
    rows: u64,
    uninjured: u64,
    injured: u64,
    killed: u64,
    persons_injured: u64,
    persons_killed: u64,
}

fn counts_for<'r>(
    records: impl IntoIterator<Item = &'r CrashRecord>,
    sex: PersonSex,
) -> GenderInjuryCounts {
    let mut tally = Tally::default();
    for record in records.into_iter().filter(|r| r.person_sex == sex) {
        tally.rows += 1;
        tally.persons_injured += u64::from(record.persons_injured);
        tally.persons_killed += u64::from(record.persons_killed);
        match record.person_injury {
            PersonInjury::Uninjured => tally.uninjured += 1,
            PersonInjury::Injured => tally.injured += 1,
            PersonInjury::Killed => tally.killed += 1,
            PersonInjury::Unknown => {}
        }
    }

    let injured = if tally.injured == 0 {
        tally.persons_injured
    } else {
        tally.injured
    };
    let killed = if tally.killed == 0 {
        tally.persons_killed
    } else {
        tally.killed
    };
    let uninjured = if tally.uninjured == 0 {
        tally.rows.saturating_sub(injured + killed)
    } else {
        tally.uninjured
    };

    GenderInjuryCounts {
        sex,
        label: sex.label().to_string(),
        uninjured,
        injured,
        killed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(sex: PersonSex, injury: PersonInjury, injured: u32, killed: u32) -> CrashRecord {
        CrashRecord {
            person_sex: sex,
            person_injury: injury,
            persons_injured: injured,
            persons_killed: killed,
            ..CrashRecord::default()
        }
    }

    #[test]
    fn females_come_before_males() {
        let records = vec![
            person(PersonSex::M, PersonInjury::Injured, 1, 0),
            person(PersonSex::F, PersonInjury::Uninjured, 0, 0),
        ];
        let sexes: Vec<PersonSex> = gender_breakdown(&records).iter().map(|g| g.sex).collect();
        assert_eq!(sexes, vec![PersonSex::F, PersonSex::M]);
        assert_eq!(gender_breakdown(&records)[1].label, "Male");
    }

    #[test]
    fn injured_falls_back_to_crash_sum_when_no_explicit_outcomes() {
        let records: Vec<CrashRecord> = (0..4)
            .map(|_| person(PersonSex::F, PersonInjury::Unknown, 3, 0))
            .collect();
        let breakdown = gender_breakdown(&records);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].injured, 12);
        assert_eq!(breakdown[0].killed, 0);
        assert_eq!(breakdown[0].uninjured, 0);
    }

    #[test]
    fn explicit_outcomes_are_not_overridden() {
        let mut records: Vec<CrashRecord> = (0..5)
            .map(|_| person(PersonSex::M, PersonInjury::Injured, 4, 0))
            .collect();
        records.push(person(PersonSex::M, PersonInjury::Uninjured, 0, 0));
        records.push(person(PersonSex::M, PersonInjury::Uninjured, 0, 0));
        let breakdown = gender_breakdown(&records);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].injured, 5);
        assert_eq!(breakdown[0].uninjured, 2);
    }

    #[test]
    fn uninjured_falls_back_to_remaining_rows() {
        let records = vec![
            person(PersonSex::F, PersonInjury::Killed, 0, 1),
            person(PersonSex::F, PersonInjury::Unknown, 0, 0),
            person(PersonSex::F, PersonInjury::Unknown, 0, 0),
        ];
        let breakdown = gender_breakdown(&records);
        assert_eq!(breakdown[0].killed, 1);
        assert_eq!(breakdown[0].uninjured, 2);
    }

    #[test]
    fn all_zero_and_unknown_sexes_are_omitted() {
        let records = vec![person(PersonSex::Unknown, PersonInjury::Injured, 2, 1)];
        assert!(gender_breakdown(&records).is_empty());
    }
}
