//! Typed record store over the JSONL files.
//!
//! Every mutation takes the store's write lock, reads the affected files,
//! checks references and quarter ranges, then rewrites the files. Reads go
//! straight to disk; `write_all` renames into place, so a reader never sees
//! a half-written file.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    IdSequences, JsonlReader, JsonlWriter, RecordKind, StagedFile, StorageConfig, StorageError,
};
use crate::models::{
    next_id, ClubSnapshot, Entry, EntryId, Goal, Match, MatchId, Member, MemberId, NewEntry,
    NewGoal, NewMatch, NewMember, Rating, RatingUpsert, Turnover, TurnoverUpsert,
    MAX_QUARTERS, MAX_RATING_SCORE, MIN_RATING_SCORE,
};

/// Errors from record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Rows removed by a match delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchRemoval {
    pub match_id: MatchId,
    pub goals: usize,
    pub turnovers: usize,
    pub ratings: usize,
    pub entries: usize,
}

/// The club's records on disk.
pub struct ClubStore {
    config: StorageConfig,
    write_lock: Mutex<()>,
}

fn find_match(matches: &[Match], id: MatchId) -> StoreResult<&Match> {
    matches
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| StoreError::NotFound(format!("match {}", id)))
}

fn require_member(members: &[Member], id: MemberId) -> StoreResult<()> {
    if members.iter().any(|m| m.id == id) {
        Ok(())
    } else {
        Err(StoreError::NotFound(format!("member {}", id)))
    }
}

/// Drop the rows of one match, returning how many went.
fn remove_for_match<T>(
    rows: &mut Vec<T>,
    match_of: impl Fn(&T) -> MatchId,
    id: MatchId,
) -> usize {
    let before = rows.len();
    rows.retain(|row| match_of(row) != id);
    before - rows.len()
}

fn check_quarter(m: &Match, quarter: u32) -> StoreResult<()> {
    if m.has_quarter(quarter) {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!(
            "quarter {} outside 1..={} for match {}",
            quarter, m.quarters, m.id
        )))
    }
}

fn validate_member(draft: &NewMember) -> StoreResult<()> {
    if draft.name.trim().is_empty() {
        return Err(StoreError::Invalid("member name is required".to_string()));
    }
    Ok(())
}

fn validate_match(draft: &NewMatch) -> StoreResult<()> {
    if !(1..=MAX_QUARTERS).contains(&draft.quarters) {
        return Err(StoreError::Invalid(format!(
            "quarters {} outside 1..={}",
            draft.quarters, MAX_QUARTERS
        )));
    }
    if draft.location.trim().is_empty() {
        return Err(StoreError::Invalid("match location is required".to_string()));
    }
    Ok(())
}

impl ClubStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Open the store, creating the records directory if needed.
    pub fn open(config: StorageConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(config.records_dir()).map_err(StorageError::from)?;
        info!("Opened club store at {:?}", config.records_dir());
        Ok(Self::new(config))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn load<T: DeserializeOwned>(&self, kind: RecordKind) -> StoreResult<Vec<T>> {
        Ok(JsonlReader::for_kind(&self.config, kind).read_all()?)
    }

    fn save<T: Serialize>(&self, kind: RecordKind, records: &[T]) -> StoreResult<()> {
        JsonlWriter::for_kind(&self.config, kind).write_all(records)?;
        Ok(())
    }

    fn stage<T: Serialize>(&self, kind: RecordKind, records: &[T]) -> StoreResult<StagedFile> {
        Ok(JsonlWriter::for_kind(&self.config, kind).stage(records)?)
    }

    /// Reserve the next id of `kind`. `floor` is one past the highest id
    /// currently on disk.
    fn allocate_id(&self, kind: RecordKind, floor: u32) -> StoreResult<u32> {
        let mut sequences = IdSequences::load(&self.config)?;
        let id = sequences.next(kind, floor);
        sequences.save(&self.config)?;
        Ok(id)
    }

    fn append<T: Serialize>(&self, kind: RecordKind, record: &T) -> StoreResult<()> {
        JsonlWriter::for_kind(&self.config, kind).append(record)?;
        Ok(())
    }

    /// All six collections, read under the write lock so a cascade delete
    /// is never seen half-done.
    pub fn snapshot(&self) -> StoreResult<ClubSnapshot> {
        let _guard = self.lock()?;
        let snapshot = ClubSnapshot {
            members: self.load(RecordKind::Member)?,
            matches: self.load(RecordKind::Match)?,
            goals: self.load(RecordKind::Goal)?,
            entries: self.load(RecordKind::Entry)?,
            turnovers: self.load(RecordKind::Turnover)?,
            ratings: self.load(RecordKind::Rating)?,
        };
        debug!(
            "Snapshot: {} members, {} matches, {} goals",
            snapshot.members.len(),
            snapshot.matches.len(),
            snapshot.goals.len()
        );
        Ok(snapshot)
    }

    // Members

    pub fn list_members(&self) -> StoreResult<Vec<Member>> {
        self.load(RecordKind::Member)
    }

    pub fn get_member(&self, id: MemberId) -> StoreResult<Member> {
        self.list_members()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("member {}", id)))
    }

    pub fn create_member(&self, draft: NewMember) -> StoreResult<Member> {
        validate_member(&draft)?;
        let _guard = self.lock()?;

        let members: Vec<Member> = self.load(RecordKind::Member)?;
        let member = Member::new(
            self.allocate_id(RecordKind::Member, next_id(&members, |m| m.id))?,
            draft.name.trim().to_string(),
            draft.phone_number.trim().to_string(),
            draft.team,
            draft.number,
            draft.birth_date,
            draft.generation,
        );
        self.append(RecordKind::Member, &member)?;

        info!("Created member {} ({})", member.id, member.name);
        Ok(member)
    }

    pub fn update_member(&self, id: MemberId, draft: NewMember) -> StoreResult<Member> {
        validate_member(&draft)?;
        let _guard = self.lock()?;

        let mut members: Vec<Member> = self.load(RecordKind::Member)?;
        let member = members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("member {}", id)))?;

        member.name = draft.name.trim().to_string();
        member.phone_number = draft.phone_number.trim().to_string();
        member.team = draft.team;
        member.number = draft.number;
        member.birth_date = draft.birth_date;
        member.generation = draft.generation;
        member.updated_at = Utc::now();
        let updated = member.clone();

        self.save(RecordKind::Member, &members)?;
        info!("Updated member {}", id);
        Ok(updated)
    }

    /// Delete a member that no record refers to.
    pub fn delete_member(&self, id: MemberId) -> StoreResult<()> {
        let _guard = self.lock()?;

        let mut members: Vec<Member> = self.load(RecordKind::Member)?;
        require_member(&members, id)?;

        let entries: Vec<Entry> = self.load(RecordKind::Entry)?;
        let goals: Vec<Goal> = self.load(RecordKind::Goal)?;
        let turnovers: Vec<Turnover> = self.load(RecordKind::Turnover)?;
        let ratings: Vec<Rating> = self.load(RecordKind::Rating)?;
        let matches: Vec<Match> = self.load(RecordKind::Match)?;

        let referenced = entries.iter().any(|e| e.member_id == id)
            || goals
                .iter()
                .any(|g| g.scorer_id == id || g.assist_id == Some(id))
            || turnovers.iter().any(|t| t.member_id == id)
            || ratings.iter().any(|r| r.member_id == id)
            || matches.iter().any(|m| m.mom_id == Some(id));
        if referenced {
            return Err(StoreError::Conflict(format!(
                "member {} still has match records",
                id
            )));
        }

        members.retain(|m| m.id != id);
        self.save(RecordKind::Member, &members)?;
        info!("Deleted member {}", id);
        Ok(())
    }

    /// Bulk insert. Members whose name and phone number are already on the
    /// roster (or earlier in the batch) are skipped. Returns how many were
    /// created.
    pub fn import_members(&self, drafts: Vec<NewMember>) -> StoreResult<usize> {
        for draft in &drafts {
            validate_member(draft)?;
        }
        let _guard = self.lock()?;

        let mut members: Vec<Member> = self.load(RecordKind::Member)?;
        let mut sequences = IdSequences::load(&self.config)?;
        let mut created = 0;

        for draft in drafts {
            let name = draft.name.trim().to_string();
            let phone = draft.phone_number.trim().to_string();
            if members
                .iter()
                .any(|m| m.name == name && m.phone_number == phone)
            {
                debug!("Skipping duplicate member {}", name);
                continue;
            }

            let member = Member::new(
                sequences.next(RecordKind::Member, next_id(&members, |m| m.id)),
                name,
                phone,
                draft.team,
                draft.number,
                draft.birth_date,
                draft.generation,
            );
            members.push(member);
            created += 1;
        }

        if created > 0 {
            sequences.save(&self.config)?;
            self.save(RecordKind::Member, &members)?;
        }
        info!("Imported {} members", created);
        Ok(created)
    }

    // Matches

    /// Matches, most recent first.
    pub fn list_matches(&self) -> StoreResult<Vec<Match>> {
        let mut matches: Vec<Match> = self.load(RecordKind::Match)?;
        matches.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.start_time.cmp(&a.start_time))
                .then(b.id.cmp(&a.id))
        });
        Ok(matches)
    }

    pub fn get_match(&self, id: MatchId) -> StoreResult<Match> {
        let matches: Vec<Match> = self.load(RecordKind::Match)?;
        find_match(&matches, id).cloned()
    }

    pub fn create_match(&self, draft: NewMatch) -> StoreResult<Match> {
        validate_match(&draft)?;
        let _guard = self.lock()?;

        let matches: Vec<Match> = self.load(RecordKind::Match)?;
        let new_match = Match::new(
            self.allocate_id(RecordKind::Match, next_id(&matches, |m| m.id))?,
            draft.date,
            draft.start_time,
            draft.end_time,
            draft.location.trim().to_string(),
            draft.quarters,
        );
        self.append(RecordKind::Match, &new_match)?;

        info!("Created match {} on {}", new_match.id, new_match.date);
        Ok(new_match)
    }

    /// Highest quarter referenced by any record of the match, or 0.
    fn highest_quarter_in_use(&self, match_id: MatchId) -> StoreResult<u32> {
        let entries: Vec<Entry> = self.load(RecordKind::Entry)?;
        let goals: Vec<Goal> = self.load(RecordKind::Goal)?;
        let turnovers: Vec<Turnover> = self.load(RecordKind::Turnover)?;

        let highest = entries
            .iter()
            .filter(|e| e.match_id == match_id)
            .map(|e| e.quarter)
            .chain(goals.iter().filter(|g| g.match_id == match_id).map(|g| g.quarter))
            .chain(
                turnovers
                    .iter()
                    .filter(|t| t.match_id == match_id)
                    .map(|t| t.quarter),
            )
            .max()
            .unwrap_or(0);
        Ok(highest)
    }

    pub fn update_match(&self, id: MatchId, draft: NewMatch) -> StoreResult<Match> {
        validate_match(&draft)?;
        let _guard = self.lock()?;

        let mut matches: Vec<Match> = self.load(RecordKind::Match)?;
        find_match(&matches, id)?;

        let in_use = self.highest_quarter_in_use(id)?;
        if draft.quarters < in_use {
            return Err(StoreError::Conflict(format!(
                "match {} has records in quarter {}",
                id, in_use
            )));
        }

        let mut updated = None;
        for m in matches.iter_mut().filter(|m| m.id == id) {
            m.date = draft.date;
            m.start_time = draft.start_time;
            m.end_time = draft.end_time;
            m.location = draft.location.trim().to_string();
            m.quarters = draft.quarters;
            m.updated_at = Utc::now();
            updated = Some(m.clone());
        }
        let updated = updated.ok_or_else(|| StoreError::NotFound(format!("match {}", id)))?;

        self.save(RecordKind::Match, &matches)?;
        info!("Updated match {}", id);
        Ok(updated)
    }

    /// Set or clear the man of the match.
    pub fn set_mom(&self, id: MatchId, mom_id: Option<MemberId>) -> StoreResult<Match> {
        let _guard = self.lock()?;

        if let Some(member_id) = mom_id {
            let members: Vec<Member> = self.load(RecordKind::Member)?;
            require_member(&members, member_id)?;
        }

        let mut matches: Vec<Match> = self.load(RecordKind::Match)?;
        let m = matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("match {}", id)))?;
        m.mom_id = mom_id;
        m.updated_at = Utc::now();
        let updated = m.clone();

        self.save(RecordKind::Match, &matches)?;
        info!("Set MOM of match {} to {:?}", id, mom_id);
        Ok(updated)
    }

    /// Delete a match and every record that belongs to it.
    ///
    /// All five replacement files are written before any is renamed into
    /// place, so a failed write leaves every file untouched. The renames run
    /// dependents first (goals, turnovers, ratings, entries) and the match
    /// row last: if one fails, the match survives and no record points at
    /// a missing match.
    pub fn delete_match(&self, id: MatchId) -> StoreResult<MatchRemoval> {
        let _guard = self.lock()?;

        let mut matches: Vec<Match> = self.load(RecordKind::Match)?;
        find_match(&matches, id)?;

        let mut goals: Vec<Goal> = self.load(RecordKind::Goal)?;
        let mut turnovers: Vec<Turnover> = self.load(RecordKind::Turnover)?;
        let mut ratings: Vec<Rating> = self.load(RecordKind::Rating)?;
        let mut entries: Vec<Entry> = self.load(RecordKind::Entry)?;

        let removal = MatchRemoval {
            match_id: id,
            goals: remove_for_match(&mut goals, |g| g.match_id, id),
            turnovers: remove_for_match(&mut turnovers, |t| t.match_id, id),
            ratings: remove_for_match(&mut ratings, |r| r.match_id, id),
            entries: remove_for_match(&mut entries, |e| e.match_id, id),
        };
        matches.retain(|m| m.id != id);

        let staged = [
            self.stage(RecordKind::Goal, &goals)?,
            self.stage(RecordKind::Turnover, &turnovers)?,
            self.stage(RecordKind::Rating, &ratings)?,
            self.stage(RecordKind::Entry, &entries)?,
            self.stage(RecordKind::Match, &matches)?,
        ];
        for file in staged {
            file.commit()?;
        }

        info!(
            "Deleted match {} ({} goals, {} turnovers, {} ratings, {} entries)",
            id, removal.goals, removal.turnovers, removal.ratings, removal.entries
        );
        Ok(removal)
    }

    // Goals

    pub fn list_goals(&self) -> StoreResult<Vec<Goal>> {
        self.load(RecordKind::Goal)
    }

    pub fn match_goals(&self, match_id: MatchId) -> StoreResult<Vec<Goal>> {
        self.get_match(match_id)?;
        Ok(JsonlReader::for_kind(&self.config, RecordKind::Goal)
            .read_where(|g: &Goal| g.match_id == match_id)?)
    }

    pub fn create_goal(&self, match_id: MatchId, draft: NewGoal) -> StoreResult<Goal> {
        let _guard = self.lock()?;

        let matches: Vec<Match> = self.load(RecordKind::Match)?;
        let m = find_match(&matches, match_id)?;
        check_quarter(m, draft.quarter)?;

        let members: Vec<Member> = self.load(RecordKind::Member)?;
        require_member(&members, draft.scorer_id)?;
        if let Some(assist_id) = draft.assist_id {
            if assist_id == draft.scorer_id {
                return Err(StoreError::Invalid(
                    "a scorer cannot assist their own goal".to_string(),
                ));
            }
            require_member(&members, assist_id)?;
        }

        let goals: Vec<Goal> = self.load(RecordKind::Goal)?;
        let goal = Goal {
            id: self.allocate_id(RecordKind::Goal, next_id(&goals, |g| g.id))?,
            match_id,
            scorer_id: draft.scorer_id,
            assist_id: draft.assist_id,
            quarter: draft.quarter,
            team: draft.team,
        };
        self.append(RecordKind::Goal, &goal)?;

        info!(
            "Goal {} for {} in match {} Q{}",
            goal.id, goal.team, match_id, goal.quarter
        );
        Ok(goal)
    }

    /// Delete every goal of every match. Returns how many were removed.
    pub fn reset_goals(&self) -> StoreResult<usize> {
        let _guard = self.lock()?;

        let goals: Vec<Goal> = self.load(RecordKind::Goal)?;
        self.save::<Goal>(RecordKind::Goal, &[])?;

        info!("Reset goals: removed {}", goals.len());
        Ok(goals.len())
    }

    // Entries

    pub fn list_entries(&self) -> StoreResult<Vec<Entry>> {
        self.load(RecordKind::Entry)
    }

    pub fn match_entries(&self, match_id: MatchId) -> StoreResult<Vec<Entry>> {
        self.get_match(match_id)?;
        Ok(JsonlReader::for_kind(&self.config, RecordKind::Entry)
            .read_where(|e: &Entry| e.match_id == match_id)?)
    }

    pub fn create_entry(&self, match_id: MatchId, draft: NewEntry) -> StoreResult<Entry> {
        let _guard = self.lock()?;

        let matches: Vec<Match> = self.load(RecordKind::Match)?;
        check_quarter(find_match(&matches, match_id)?, draft.quarter)?;

        let members: Vec<Member> = self.load(RecordKind::Member)?;
        require_member(&members, draft.member_id)?;

        let entries: Vec<Entry> = self.load(RecordKind::Entry)?;
        if entries.iter().any(|e| {
            e.match_id == match_id && e.member_id == draft.member_id && e.quarter == draft.quarter
        }) {
            return Err(StoreError::Conflict(format!(
                "member {} already entered for match {} Q{}",
                draft.member_id, match_id, draft.quarter
            )));
        }

        let entry = Entry {
            id: self.allocate_id(RecordKind::Entry, next_id(&entries, |e| e.id))?,
            match_id,
            member_id: draft.member_id,
            quarter: draft.quarter,
            team: draft.team,
        };
        self.append(RecordKind::Entry, &entry)?;

        info!(
            "Entered member {} for {} in match {} Q{}",
            entry.member_id, entry.team, match_id, entry.quarter
        );
        Ok(entry)
    }

    pub fn delete_entry(&self, match_id: MatchId, entry_id: EntryId) -> StoreResult<()> {
        let _guard = self.lock()?;

        let mut entries: Vec<Entry> = self.load(RecordKind::Entry)?;
        let before = entries.len();
        entries.retain(|e| !(e.id == entry_id && e.match_id == match_id));
        if entries.len() == before {
            return Err(StoreError::NotFound(format!(
                "entry {} of match {}",
                entry_id, match_id
            )));
        }

        self.save(RecordKind::Entry, &entries)?;
        info!("Deleted entry {} of match {}", entry_id, match_id);
        Ok(())
    }

    // Turnovers

    pub fn list_turnovers(&self) -> StoreResult<Vec<Turnover>> {
        self.load(RecordKind::Turnover)
    }

    pub fn match_turnovers(&self, match_id: MatchId) -> StoreResult<Vec<Turnover>> {
        self.get_match(match_id)?;
        Ok(JsonlReader::for_kind(&self.config, RecordKind::Turnover)
            .read_where(|t: &Turnover| t.match_id == match_id)?)
    }

    /// Set the turnover count for (match, member, quarter), creating the
    /// row the first time.
    pub fn upsert_turnover(&self, match_id: MatchId, draft: TurnoverUpsert) -> StoreResult<Turnover> {
        let _guard = self.lock()?;

        let matches: Vec<Match> = self.load(RecordKind::Match)?;
        check_quarter(find_match(&matches, match_id)?, draft.quarter)?;

        let members: Vec<Member> = self.load(RecordKind::Member)?;
        require_member(&members, draft.member_id)?;

        let mut turnovers: Vec<Turnover> = self.load(RecordKind::Turnover)?;
        let existing = turnovers.iter_mut().find(|t| {
            t.match_id == match_id && t.member_id == draft.member_id && t.quarter == draft.quarter
        });

        let turnover = match existing {
            Some(t) => {
                t.count = draft.count;
                t.clone()
            }
            None => {
                let t = Turnover {
                    id: self.allocate_id(
                        RecordKind::Turnover,
                        next_id(&turnovers, |t| t.id),
                    )?,
                    match_id,
                    member_id: draft.member_id,
                    quarter: draft.quarter,
                    count: draft.count,
                };
                turnovers.push(t.clone());
                t
            }
        };
        self.save(RecordKind::Turnover, &turnovers)?;

        info!(
            "Turnovers for member {} in match {} Q{}: {}",
            turnover.member_id, match_id, turnover.quarter, turnover.count
        );
        Ok(turnover)
    }

    // Ratings

    pub fn list_ratings(&self) -> StoreResult<Vec<Rating>> {
        self.load(RecordKind::Rating)
    }

    pub fn match_ratings(&self, match_id: MatchId) -> StoreResult<Vec<Rating>> {
        self.get_match(match_id)?;
        Ok(JsonlReader::for_kind(&self.config, RecordKind::Rating)
            .read_where(|r: &Rating| r.match_id == match_id)?)
    }

    /// Set a member's rating for a match, creating the row the first time.
    pub fn upsert_rating(&self, match_id: MatchId, draft: RatingUpsert) -> StoreResult<Rating> {
        if !(MIN_RATING_SCORE..=MAX_RATING_SCORE).contains(&draft.score) {
            return Err(StoreError::Invalid(format!(
                "rating {} outside {}..={}",
                draft.score, MIN_RATING_SCORE, MAX_RATING_SCORE
            )));
        }
        let _guard = self.lock()?;

        let matches: Vec<Match> = self.load(RecordKind::Match)?;
        find_match(&matches, match_id)?;

        let members: Vec<Member> = self.load(RecordKind::Member)?;
        require_member(&members, draft.member_id)?;

        let mut ratings: Vec<Rating> = self.load(RecordKind::Rating)?;
        let existing = ratings
            .iter_mut()
            .find(|r| r.match_id == match_id && r.member_id == draft.member_id);

        let rating = match existing {
            Some(r) => {
                r.score = draft.score;
                r.clone()
            }
            None => {
                let r = Rating {
                    id: self.allocate_id(RecordKind::Rating, next_id(&ratings, |r| r.id))?,
                    match_id,
                    member_id: draft.member_id,
                    score: draft.score,
                };
                ratings.push(r.clone());
                r
            }
        };
        self.save(RecordKind::Rating, &ratings)?;

        info!(
            "Rated member {} in match {}: {}",
            rating.member_id, match_id, rating.score
        );
        Ok(rating)
    }
}
