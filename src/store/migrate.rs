use crate::store::{Store, StoreError};

const SCHEMA_VERSION_KEY: &str = "schema_version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

/// Ordered schema migrations; index + 1 is the version a migration
/// brings the store to. Every migration must be idempotent: a crash
/// between the migration body and the version stamp replays it on the
/// next open.
const MIGRATIONS: &[(&str, MigrationFn)] = &[("001_initial_trees", m001_initial_trees)];

pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = schema_version(store)?;

    for (index, (name, migration)) in MIGRATIONS.iter().enumerate() {
        let version = (index + 1) as u32;
        if version <= current {
            tracing::debug!(version, name, "Migration already applied, skipping");
            continue;
        }
        tracing::info!(version, name, "Running migration");
        migration(store)?;
        stamp_version(store, version)?;
        tracing::info!(version, name, "Migration complete");
    }

    Ok(())
}

pub fn schema_version(store: &Store) -> Result<u32, StoreError> {
    Ok(store
        .meta
        .get(SCHEMA_VERSION_KEY.as_bytes())?
        .and_then(|raw| raw.as_ref().try_into().ok())
        .map(u32::from_be_bytes)
        .unwrap_or(0))
}

/// Version stamps only move forward; a downgrade attempt is a
/// deployment error, not something to paper over.
pub fn stamp_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = schema_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("refuse to downgrade schema from {current} to {version}"),
        });
    }
    store
        .meta
        .insert(SCHEMA_VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

/// The named trees are opened eagerly in `Store::open`, so the first
/// migration only stamps the version.
fn m001_initial_trees(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn migration_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        run(&store).unwrap();
        assert_eq!(schema_version(&store).unwrap(), 1);
        run(&store).unwrap();
        assert_eq!(schema_version(&store).unwrap(), 1);
    }

    #[test]
    fn downgrade_is_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db2").to_str().unwrap()).unwrap();

        stamp_version(&store, 3).unwrap();
        let err = stamp_version(&store, 2).unwrap_err();
        assert!(matches!(err, StoreError::Migration { .. }));
    }
}
