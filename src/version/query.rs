use std::cmp::Ordering;

use super::VersionRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderField {
    Number,
    CreatedAt,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    pub field: OrderField,
    pub direction: Direction,
}

impl Order {
    pub fn number_desc() -> Self {
        Order {
            field: OrderField::Number,
            direction: Direction::Desc,
        }
    }

    pub fn number_asc() -> Self {
        Order {
            field: OrderField::Number,
            direction: Direction::Asc,
        }
    }

    pub fn created_at_desc() -> Self {
        Order {
            field: OrderField::CreatedAt,
            direction: Direction::Desc,
        }
    }

    pub fn created_at_asc() -> Self {
        Order {
            field: OrderField::CreatedAt,
            direction: Direction::Asc,
        }
    }

    /// Ties are broken by record id, which follows insertion order.
    fn compare(&self, a: &VersionRecord, b: &VersionRecord) -> Ordering {
        let ordering = match self.field {
            OrderField::Number => a.number.cmp(&b.number),
            OrderField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
        .then(a.id.cmp(&b.id));

        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::created_at_desc()
    }
}

/// Filter, order and limit for reading version records.
///
/// Unset fields don't constrain the result. `merge` lays caller-supplied
/// options over a set of defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VersionQuery {
    pub versionable_type: Option<String>,
    pub versionable_id: Option<String>,
    pub scope_reference: Option<String>,
    pub user_reference: Option<String>,
    pub number_gt: Option<u64>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl VersionQuery {
    pub fn new() -> Self {
        VersionQuery::default()
    }

    pub fn for_entity(
        mut self,
        versionable_type: impl Into<String>,
        versionable_id: impl Into<String>,
    ) -> Self {
        self.versionable_type = Some(versionable_type.into());
        self.versionable_id = Some(versionable_id.into());
        self
    }

    pub fn of_type(mut self, versionable_type: impl Into<String>) -> Self {
        self.versionable_type = Some(versionable_type.into());
        self
    }

    pub fn scoped_to(mut self, scope_reference: impl Into<String>) -> Self {
        self.scope_reference = Some(scope_reference.into());
        self
    }

    pub fn by_user(mut self, user_reference: impl Into<String>) -> Self {
        self.user_reference = Some(user_reference.into());
        self
    }

    /// Only versions with `number > n`.
    pub fn after_number(mut self, n: u64) -> Self {
        self.number_gt = Some(n);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Fields set on `overrides` replace the ones on `self`.
    pub fn merge(self, overrides: VersionQuery) -> Self {
        VersionQuery {
            versionable_type: overrides.versionable_type.or(self.versionable_type),
            versionable_id: overrides.versionable_id.or(self.versionable_id),
            scope_reference: overrides.scope_reference.or(self.scope_reference),
            user_reference: overrides.user_reference.or(self.user_reference),
            number_gt: overrides.number_gt.or(self.number_gt),
            order: overrides.order.or(self.order),
            limit: overrides.limit.or(self.limit),
        }
    }

    pub fn matches(&self, record: &VersionRecord) -> bool {
        fn eq(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f == value)
        }

        eq(&self.versionable_type, &record.versionable_type)
            && eq(&self.versionable_id, &record.versionable_id)
            && self
                .scope_reference
                .as_deref()
                .map_or(true, |s| record.scope_reference.as_deref() == Some(s))
            && self
                .user_reference
                .as_deref()
                .map_or(true, |u| record.user_reference.as_deref() == Some(u))
            && self.number_gt.map_or(true, |n| record.number > n)
    }

    /// Filter, sort and truncate records.
    pub fn apply<'a, I>(&self, records: I) -> Vec<VersionRecord>
    where
        I: IntoIterator<Item = &'a VersionRecord>,
    {
        let mut selected: Vec<VersionRecord> = records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        let order = self.order.unwrap_or_default();
        selected.sort_by(|a, b| order.compare(a, b));

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}
