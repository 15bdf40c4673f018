//! Split point search for merges
//!
//! The split point of a head commit H and a target commit T is the commit the two
//! histories diverged from. It decides which side changed a file, so every merge
//! starts here.
//!
//! ## Algorithm
//!
//! 1. Mark every ancestor of T: T itself, its primary parents and, through merge
//!    commits, everything reachable from their secondary parents.
//! 2. Walk H's primary-parent chain outward. At each commit `a`, collect the chain
//!    of secondary parents hanging off it (`a`, its secondary parent when `a` is a
//!    merge, that commit's secondary parent, and so on) and test it deepest first,
//!    so `a` itself is tested last.
//! 3. The first commit found among T's ancestors is the split point.
//!
//! This is a first-match search rather than a lowest-common-ancestor computation.
//! In histories where several merge paths meet it can pick a common ancestor that
//! is not the lowest one, which is the behavior merges have always had here.
//!
//! Both traversals use explicit stacks, so deep histories cannot overflow the call
//! stack.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        /// Reachable from the target commit
        const TARGET_ANCESTOR = 0b01;
        /// Already tested during the walk from the head commit
        const SEEN_FROM_HEAD = 0b10;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::TARGET_ANCESTOR) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::SEEN_FROM_HEAD) {
            flags.push("HEAD");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Finds the split point of two commits
///
/// Commits are fetched through `commit_loader`, so the search runs the same way
/// against the object store and against an in-memory graph.
pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Split point of `head` and `target`
    ///
    /// Commits of one repository always share the root, so `None` only comes back
    /// for commits from unrelated graphs.
    pub fn find_split_point(
        &self,
        head: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut states = self.mark_target_ancestors(target)?;

        let mut primary_chain = Some(head.clone());
        while let Some(commit_oid) = primary_chain {
            let commit = (self.commit_loader)(&commit_oid)?;

            for candidate in self.secondary_chain(&states, commit.clone())?.iter().rev() {
                if Self::is_target_ancestor(&states, candidate) {
                    tracing::debug!(%head, %target, split_point = %candidate, "found split point");
                    return Ok(Some(candidate.clone()));
                }
                Self::mark(&mut states, candidate, VisitState::SEEN_FROM_HEAD);
            }

            primary_chain = commit.parents.primary().cloned();
        }

        Ok(None)
    }

    /// `start` followed by its chain of secondary parents, nearest first
    ///
    /// The chain stops before a commit already tested from the head side: that
    /// commit and everything deeper on its chain are known not to be ancestors of
    /// the target.
    fn secondary_chain(
        &self,
        states: &HashMap<ObjectId, VisitState>,
        start: SlimCommit,
    ) -> anyhow::Result<Vec<ObjectId>> {
        let mut chain = Vec::new();
        let mut current = Some(start);

        while let Some(commit) = current {
            if Self::has_state(states, &commit.oid, VisitState::SEEN_FROM_HEAD) {
                break;
            }

            current = match commit.parents.secondary() {
                Some(secondary_oid) => Some((self.commit_loader)(secondary_oid)?),
                None => None,
            };
            chain.push(commit.oid);
        }

        Ok(chain)
    }

    fn mark_target_ancestors(
        &self,
        target: &ObjectId,
    ) -> anyhow::Result<HashMap<ObjectId, VisitState>> {
        let mut states = HashMap::<ObjectId, VisitState>::new();
        let mut stack = vec![target.clone()];

        while let Some(commit_oid) = stack.pop() {
            if Self::is_target_ancestor(&states, &commit_oid) {
                continue;
            }
            Self::mark(&mut states, &commit_oid, VisitState::TARGET_ANCESTOR);

            let commit = (self.commit_loader)(&commit_oid)?;
            stack.extend(
                commit
                    .parents
                    .iter()
                    .filter(|parent| !Self::is_target_ancestor(&states, parent))
                    .cloned(),
            );
        }

        tracing::trace!(%target, ancestors = states.len(), "marked target ancestors");
        Ok(states)
    }

    fn is_target_ancestor(states: &HashMap<ObjectId, VisitState>, oid: &ObjectId) -> bool {
        Self::has_state(states, oid, VisitState::TARGET_ANCESTOR)
    }

    fn has_state(states: &HashMap<ObjectId, VisitState>, oid: &ObjectId, state: VisitState) -> bool {
        states
            .get(oid)
            .is_some_and(|current| current.contains(state))
    }

    fn mark(states: &mut HashMap<ObjectId, VisitState>, oid: &ObjectId, state: VisitState) {
        states
            .entry(oid.clone())
            .and_modify(|current| current.insert(state))
            .or_insert(state);
    }
}
