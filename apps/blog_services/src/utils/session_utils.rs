use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use r2d2_redis::redis::Commands;
use redis_libs::RedisPool;
use uuid::Uuid;

/// Server-side record of live sessions: session id → user id.
pub trait SessionStore: Send + Sync {
    fn save(&self, session_id: Uuid, user_id: Uuid, ttl: u64) -> Result<(), String>;
    fn find(&self, session_id: Uuid) -> Result<Option<Uuid>, String>;
    fn delete(&self, session_id: Uuid) -> Result<(), String>;
}

pub struct RedisSessionStore {
    redis_pool: RedisPool,
}

impl RedisSessionStore {
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }

    fn redis_key(session_id: Uuid) -> String {
        format!("session:{}", session_id)
    }
}

impl SessionStore for RedisSessionStore {
    fn save(&self, session_id: Uuid, user_id: Uuid, ttl: u64) -> Result<(), String> {
        let mut conn = self.redis_pool.get().map_err(|e| e.to_string())?;
        conn.set_ex::<String, String, ()>(Self::redis_key(session_id), user_id.to_string(), ttl as usize)
            .map_err(|error| format!("error redis: {}", error))
    }

    fn find(&self, session_id: Uuid) -> Result<Option<Uuid>, String> {
        let mut conn = self.redis_pool.get().map_err(|e| e.to_string())?;
        let user_id: Option<String> = conn
            .get::<String, Option<String>>(Self::redis_key(session_id))
            .map_err(|error| format!("error redis: {}", error))?;

        match user_id {
            Some(raw) => raw
                .parse::<Uuid>()
                .map(Some)
                .map_err(|error| format!("corrupt session record: {}", error)),
            None => Ok(None),
        }
    }

    fn delete(&self, session_id: Uuid) -> Result<(), String> {
        let mut conn = self.redis_pool.get().map_err(|e| e.to_string())?;
        conn.del::<String, ()>(Self::redis_key(session_id))
            .map_err(|error| format!("error redis: {}", error))
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<Uuid, (Uuid, Instant)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, session_id: Uuid, user_id: Uuid, ttl: u64) -> Result<(), String> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(session_id, (user_id, now + Duration::from_secs(ttl)));
        Ok(())
    }

    fn find(&self, session_id: Uuid) -> Result<Option<Uuid>, String> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(&session_id).copied() {
            Some((user_id, expires_at)) if expires_at > Instant::now() => Ok(Some(user_id)),
            Some(_) => {
                sessions.remove(&session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn delete(&self, session_id: Uuid) -> Result<(), String> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sessions_resolve_until_deleted() {
        let store = MemorySessionStore::new();
        let (session_id, user_id) = (Uuid::new_v4(), Uuid::new_v4());

        store.save(session_id, user_id, 60).unwrap();
        assert_eq!(store.find(session_id).unwrap(), Some(user_id));

        store.delete(session_id).unwrap();
        assert_eq!(store.find(session_id).unwrap(), None);
    }

    #[test]
    fn saving_sweeps_expired_sessions() {
        let store = MemorySessionStore::new();
        store.save(Uuid::new_v4(), Uuid::new_v4(), 0).unwrap();
        store.save(Uuid::new_v4(), Uuid::new_v4(), 0).unwrap();

        let live = Uuid::new_v4();
        store.save(live, Uuid::new_v4(), 60).unwrap();

        let sessions = store.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&live));
    }

    #[test]
    fn expired_memory_sessions_are_dropped() {
        let store = MemorySessionStore::new();
        let session_id = Uuid::new_v4();

        store.save(session_id, Uuid::new_v4(), 0).unwrap();
        assert_eq!(store.find(session_id).unwrap(), None);
    }
}
