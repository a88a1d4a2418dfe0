/// Event membership links
///
/// Events relate to organizers and to participants through join tables that
/// carry nothing but the two ids. Links change only through three operations:
///
/// - **connect**: add links, ignoring ones that already exist
/// - **disconnect**: remove one link
/// - **set**: replace every link on one side with the given list
///
/// All operations take a `&mut PgConnection` so callers can run them inside
/// the same transaction as the row they belong to.
///
/// # Example
///
/// ```no_run
/// use eventhub_shared::models::relation::EVENT_PARTICIPANTS;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
/// EVENT_PARTICIPANTS.connect_members(&mut tx, 1, &[4, 5]).await?;
/// EVENT_PARTICIPANTS.set_events(&mut tx, 4, &[1, 2]).await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgConnection;

/// A join table between events and one kind of member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    table: &'static str,
    member_column: &'static str,
}

/// `event_participants(event_id, participant_id)`
pub const EVENT_PARTICIPANTS: Relation = Relation {
    table: "event_participants",
    member_column: "participant_id",
};

/// `event_organizers(event_id, organizer_id)`
pub const EVENT_ORGANIZERS: Relation = Relation {
    table: "event_organizers",
    member_column: "organizer_id",
};

impl Relation {
    /// Join table name
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Column holding the member id
    pub fn member_column(&self) -> &'static str {
        self.member_column
    }

    /// Links one event to one member; returns false if already linked
    pub async fn connect(
        &self,
        conn: &mut PgConnection,
        event_id: i32,
        member_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (event_id, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            self.table, self.member_column
        );

        let result = sqlx::query(&query)
            .bind(event_id)
            .bind(member_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes one link; returns false if there was none
    pub async fn disconnect(
        &self,
        conn: &mut PgConnection,
        event_id: i32,
        member_id: i32,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE event_id = $1 AND {} = $2",
            self.table, self.member_column
        );

        let result = sqlx::query(&query)
            .bind(event_id)
            .bind(member_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Adds links from one event to many members
    pub async fn connect_members(
        &self,
        conn: &mut PgConnection,
        event_id: i32,
        member_ids: &[i32],
    ) -> Result<(), sqlx::Error> {
        if member_ids.is_empty() {
            return Ok(());
        }

        let query = format!(
            "INSERT INTO {} (event_id, {}) \
             SELECT $1, UNNEST($2::int4[]) \
             ON CONFLICT DO NOTHING",
            self.table, self.member_column
        );

        sqlx::query(&query)
            .bind(event_id)
            .bind(member_ids)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Adds links from one member to many events
    pub async fn connect_events(
        &self,
        conn: &mut PgConnection,
        member_id: i32,
        event_ids: &[i32],
    ) -> Result<(), sqlx::Error> {
        if event_ids.is_empty() {
            return Ok(());
        }

        let query = format!(
            "INSERT INTO {} (event_id, {}) \
             SELECT UNNEST($2::int4[]), $1 \
             ON CONFLICT DO NOTHING",
            self.table, self.member_column
        );

        sqlx::query(&query)
            .bind(member_id)
            .bind(event_ids)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Replaces every member link of one event
    pub async fn set_members(
        &self,
        conn: &mut PgConnection,
        event_id: i32,
        member_ids: &[i32],
    ) -> Result<(), sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE event_id = $1", self.table);
        sqlx::query(&query).bind(event_id).execute(&mut *conn).await?;

        self.connect_members(conn, event_id, member_ids).await
    }

    /// Replaces every event link of one member
    pub async fn set_events(
        &self,
        conn: &mut PgConnection,
        member_id: i32,
        event_ids: &[i32],
    ) -> Result<(), sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE {} = $1", self.table, self.member_column);
        sqlx::query(&query).bind(member_id).execute(&mut *conn).await?;

        self.connect_events(conn, member_id, event_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_tables() {
        assert_eq!(EVENT_PARTICIPANTS.table(), "event_participants");
        assert_eq!(EVENT_PARTICIPANTS.member_column(), "participant_id");
        assert_eq!(EVENT_ORGANIZERS.table(), "event_organizers");
        assert_eq!(EVENT_ORGANIZERS.member_column(), "organizer_id");
        assert_ne!(EVENT_PARTICIPANTS, EVENT_ORGANIZERS);
    }
}
