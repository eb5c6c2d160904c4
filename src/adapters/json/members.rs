//! Member repository on the JSON store

use crate::core::models::Member;
use crate::core::ports::{MemberRepository, StoreError, StoreResult};

use super::{JsonStore, MEMBERS, numeric_key};

impl MemberRepository for JsonStore {
    fn insert(&self, member: &Member) -> StoreResult<()> {
        if self.insert_doc(MEMBERS, &numeric_key(member.id), member)? {
            Ok(())
        } else {
            Err(StoreError::duplicate(MEMBERS, member.id))
        }
    }

    fn get(&self, id: u32) -> StoreResult<Option<Member>> {
        self.read_doc(MEMBERS, &numeric_key(id))
    }

    fn update(&self, member: &Member) -> StoreResult<()> {
        self.replace_doc(MEMBERS, &numeric_key(member.id), member)
            .map_err(|e| match e {
                StoreError::NotFound { collection, .. } => StoreError::not_found(collection, member.id),
                other => other,
            })
    }

    fn modify(
        &self,
        id: u32,
        change: &mut dyn FnMut(&mut Member) -> StoreResult<()>,
    ) -> StoreResult<Member> {
        self.update_doc(MEMBERS, &numeric_key(id), |member: &mut Member| {
            change(member)?;
            Ok(member.clone())
        })
        .map_err(|e| match e {
            StoreError::NotFound { collection, .. } => StoreError::not_found(collection, id),
            other => other,
        })
    }

    fn list(&self) -> StoreResult<Vec<Member>> {
        let mut members: Vec<Member> = self.list_docs(MEMBERS)?;
        members.sort_by_key(|m| m.id);
        Ok(members)
    }
}
