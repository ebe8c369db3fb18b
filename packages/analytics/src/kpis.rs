//! Headline KPI figures.

use std::collections::BTreeMap;

use collision_dash_collision_models::{Borough, CrashRecord};

/// Row count, injury sum and fatality sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub crashes: u64,
    pub injuries: u64,
    pub fatalities: u64,
}

/// Sums the headline counters over `records`.
pub fn totals<'r>(records: impl IntoIterator<Item = &'r CrashRecord>) -> Totals {
    records.into_iter().fold(Totals::default(), |acc, r| Totals {
        crashes: acc.crashes + 1,
        injuries: acc.injuries + u64::from(r.persons_injured),
        fatalities: acc.fatalities + u64::from(r.persons_killed),
    })
}

/// Borough with the highest summed `persons_killed`, ignoring
/// [`Borough::Unknown`].
///
/// Returns `None` when no known borough has a fatality. Ties go to the
/// alphabetically first borough.
pub fn most_dangerous_borough<'r>(
    records: impl IntoIterator<Item = &'r CrashRecord>,
) -> Option<Borough> {
    let mut killed: BTreeMap<Borough, u64> = BTreeMap::new();
    for record in records {
        if record.borough != Borough::Unknown {
            *killed.entry(record.borough).or_insert(0) += u64::from(record.persons_killed);
        }
    }

    killed
        .into_iter()
        .fold(None, |best: Option<(Borough, u64)>, (borough, sum)| match best {
            Some((_, top)) if top >= sum => best,
            _ => Some((borough, sum)),
        })
        .filter(|(_, sum)| *sum > 0)
        .map(|(borough, _)| borough)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crash(borough: Borough, injured: u32, killed: u32) -> CrashRecord {
        CrashRecord {
            borough,
            persons_injured: injured,
            persons_killed: killed,
            ..CrashRecord::default()
        }
    }

    #[test]
    fn totals_sum_counts() {
        let records = vec![
            crash(Borough::Bronx, 2, 0),
            crash(Borough::Queens, 1, 1),
            crash(Borough::Unknown, 0, 3),
        ];
        assert_eq!(
            totals(&records),
            Totals {
                crashes: 3,
                injuries: 3,
                fatalities: 4,
            }
        );
    }

    #[test]
    fn picks_borough_with_most_fatalities() {
        let records = vec![
            crash(Borough::Bronx, 0, 1),
            crash(Borough::Queens, 0, 2),
            crash(Borough::Bronx, 0, 0),
            crash(Borough::Unknown, 0, 9),
        ];
        assert_eq!(most_dangerous_borough(&records), Some(Borough::Queens));
    }

    #[test]
    fn ties_go_to_alphabetically_first_borough() {
        let records = vec![crash(Borough::Queens, 0, 2), crash(Borough::Brooklyn, 0, 2)];
        assert_eq!(most_dangerous_borough(&records), Some(Borough::Brooklyn));
    }

    #[test]
    fn no_fatalities_means_no_borough() {
        let records = vec![crash(Borough::Queens, 4, 0), crash(Borough::Unknown, 0, 5)];
        assert_eq!(most_dangerous_borough(&records), None);
        assert_eq!(most_dangerous_borough(&Vec::<CrashRecord>::new()), None);
    }
}
