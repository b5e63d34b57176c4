use anyhow::Result;
use moka::future::Cache;

use crate::api::AttendanceApi;
use crate::model::member::Member;

/// Member lookup cache for one scanning session: member id -> resolved
/// member. Created by the session owner, passed in explicitly, dropped with
/// the session. Entries are never invalidated while the session runs since
/// member identity does not change.
#[derive(Clone)]
pub struct MemberCache {
    inner: Cache<String, Member>,
}

impl MemberCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(max_capacity).build(),
        }
    }

    /// Look up a member already resolved in this session
    pub async fn get(&self, member_id: &str) -> Option<Member> {
        self.inner.get(member_id).await
    }

    /// Remember a resolved member for the rest of the session
    pub async fn insert(&self, member: Member) {
        self.inner.insert(member.member_id.clone(), member).await;
    }
}

/// Batch insert resolved members
async fn batch_fill(cache: &MemberCache, members: &[Member]) {
    let futures: Vec<_> = members
        .iter()
        .map(|m| cache.inner.insert(m.member_id.clone(), m.clone()))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Pre-load the member roster into the session cache (batched)
pub async fn warmup_member_cache(
    cache: &MemberCache,
    api: &dyn AttendanceApi,
    batch_size: usize,
) -> Result<()> {
    let members = api.list_members().await?;
    let total = members.len();

    for batch in members.chunks(batch_size) {
        batch_fill(cache, batch).await;
    }

    log::info!("Member cache warmup complete: {} members", total);

    Ok(())
}
