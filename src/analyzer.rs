use crate::error::RecommendError;
use crate::models::{normalize_text, CandidateProfile, Quota, RankedEntry, RankedResult, SeatRecord};
use std::collections::HashSet;

/// Why a seat record was left out of the ranked result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    NonPositiveRank,
    GenderPool,
    Category,
    Degree,
    Branch,
    /// The seat closed before reaching the candidate's rank.
    ClosedBeforeRank,
    /// Home-state seat at an out-of-state institution, or the reverse.
    QuotaMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Eligibility,
    Quota,
    Ordering,
}

/// Observer for a ranking pass. Implementations must not influence the result;
/// every method has a no-op default.
pub trait RankTrace {
    fn rejected(&mut self, _record: &SeatRecord, _reason: Rejection) {}

    fn stage_complete(&mut self, _stage: Stage, _remaining: usize) {}
}

pub struct NoTrace;

impl RankTrace for NoTrace {}

/// Forwards ranking events to `tracing` at debug/trace level.
pub struct LogTrace;

impl RankTrace for LogTrace {
    fn rejected(&mut self, record: &SeatRecord, reason: Rejection) {
        tracing::trace!(
            institution = %record.institution_name,
            branch = %record.branch,
            closing_rank = record.closing_rank,
            ?reason,
            "seat rejected"
        );
    }

    fn stage_complete(&mut self, stage: Stage, remaining: usize) {
        tracing::debug!(?stage, remaining, "ranking stage complete");
    }
}

type Predicate = fn(&ProfileMatcher<'_>, &SeatRecord) -> bool;

/// Eligibility checks applied to every valid record, in order.
const ELIGIBILITY: [(Rejection, Predicate); 5] = [
    (Rejection::GenderPool, same_gender_pool),
    (Rejection::Category, same_category),
    (Rejection::Degree, preferred_degree),
    (Rejection::Branch, preferred_branch),
    (Rejection::ClosedBeforeRank, open_at_rank),
];

fn same_gender_pool(m: &ProfileMatcher, r: &SeatRecord) -> bool {
    r.gender_pool == m.profile.gender_pool
}

fn same_category(m: &ProfileMatcher, r: &SeatRecord) -> bool {
    r.category == m.profile.category
}

fn preferred_degree(m: &ProfileMatcher, r: &SeatRecord) -> bool {
    m.degrees.contains(&normalize_text(&r.degree))
}

fn preferred_branch(m: &ProfileMatcher, r: &SeatRecord) -> bool {
    m.branches.contains(&normalize_text(&r.branch))
}

/// Smaller rank numbers are better, so the seat is reachable when it closed
/// at or after the candidate's rank.
fn open_at_rank(m: &ProfileMatcher, r: &SeatRecord) -> bool {
    r.closing_rank >= m.profile.rank
}

/// A candidate profile with its free-text preferences pre-normalized for matching.
struct ProfileMatcher<'a> {
    profile: &'a CandidateProfile,
    home_state: String,
    degrees: HashSet<String>,
    branches: HashSet<String>,
}

impl<'a> ProfileMatcher<'a> {
    fn new(profile: &'a CandidateProfile) -> Self {
        Self {
            profile,
            home_state: normalize_text(&profile.home_state),
            degrees: profile.degrees.iter().map(|d| normalize_text(d)).collect(),
            branches: profile.branches.iter().map(|b| normalize_text(b)).collect(),
        }
    }

    fn eligibility(&self, record: &SeatRecord) -> Result<(), Rejection> {
        match ELIGIBILITY.iter().find(|(_, keep)| !keep(self, record)) {
            Some((reason, _)) => Err(*reason),
            None => Ok(()),
        }
    }

    /// A record with no state never counts as the candidate's home state.
    fn quota(&self, record: &SeatRecord) -> Result<(), Rejection> {
        let same_state = record
            .institution_state
            .as_deref()
            .map(|state| normalize_text(state) == self.home_state)
            .unwrap_or(false);
        let required = if same_state { Quota::HomeState } else { Quota::OtherState };
        if record.quota == required {
            Ok(())
        } else {
            Err(Rejection::QuotaMismatch)
        }
    }
}

pub struct CollegeRanker<'a> {
    matcher: ProfileMatcher<'a>,
    apply_quota: bool,
}

impl<'a> CollegeRanker<'a> {
    pub fn new(profile: &'a CandidateProfile, apply_quota: bool) -> Result<Self, RecommendError> {
        if profile.rank <= 0 {
            return Err(RecommendError::InvalidProfile(format!(
                "rank must be a positive integer, got {}",
                profile.rank
            )));
        }
        Ok(Self {
            matcher: ProfileMatcher::new(profile),
            apply_quota,
        })
    }

    /// Filters and orders one seat table. The input is only borrowed; the
    /// result is freshly allocated.
    pub fn rank(&self, records: &[SeatRecord], trace: &mut dyn RankTrace) -> RankedResult {
        // Step 1: drop records with a closing rank that cannot be real
        let valid: Vec<&SeatRecord> = records
            .iter()
            .filter(|record| keep_or_trace(record, check_closing_rank(record), trace))
            .collect();
        trace.stage_complete(Stage::Validation, valid.len());

        // Step 2: gender pool, category, preferences and rank bound
        let eligible: Vec<&SeatRecord> = valid
            .into_iter()
            .filter(|record| keep_or_trace(record, self.matcher.eligibility(record), trace))
            .collect();
        trace.stage_complete(Stage::Eligibility, eligible.len());

        // Step 3: home-state / other-state partition
        let mut admissible = eligible;
        if self.apply_quota {
            admissible.retain(|record| keep_or_trace(record, self.matcher.quota(record), trace));
            trace.stage_complete(Stage::Quota, admissible.len());
        }

        // Step 4: best closing rank first; stable, so ties keep table order
        admissible.sort_by_key(|record| record.closing_rank);
        trace.stage_complete(Stage::Ordering, admissible.len());

        RankedResult {
            entries: admissible
                .into_iter()
                .map(|record| RankedEntry {
                    institution_name: record.institution_name.clone(),
                    closing_rank: record.closing_rank.unsigned_abs(),
                })
                .collect(),
        }
    }
}

fn check_closing_rank(record: &SeatRecord) -> Result<(), Rejection> {
    if record.closing_rank > 0 {
        Ok(())
    } else {
        Err(Rejection::NonPositiveRank)
    }
}

fn keep_or_trace(record: &SeatRecord, verdict: Result<(), Rejection>, trace: &mut dyn RankTrace) -> bool {
    match verdict {
        Ok(()) => true,
        Err(reason) => {
            trace.rejected(record, reason);
            false
        }
    }
}

/// Ranks the admissible seats of one institution kind for `profile`.
///
/// `apply_quota` enables the home-state/other-state partition and should be
/// set only for NIT tables. An empty table or a query nothing satisfies
/// yields an empty result; only a non-positive candidate rank is an error.
pub fn rank_colleges(
    records: &[SeatRecord],
    profile: &CandidateProfile,
    apply_quota: bool,
) -> Result<RankedResult, RecommendError> {
    rank_colleges_traced(records, profile, apply_quota, &mut NoTrace)
}

pub fn rank_colleges_traced(
    records: &[SeatRecord],
    profile: &CandidateProfile,
    apply_quota: bool,
    trace: &mut dyn RankTrace,
) -> Result<RankedResult, RecommendError> {
    let ranker = CollegeRanker::new(profile, apply_quota)?;
    Ok(ranker.rank(records, trace))
}
