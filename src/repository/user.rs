use diesel::prelude::*;

use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::models::user::User as DbUser;
use crate::repository::{DieselRepository, RepositoryResult, UserReader};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }
}
