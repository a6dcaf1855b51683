use chrono::Utc;
use diesel::prelude::*;

use crate::domain::category::{
    Category, CategoryUpdate, NewCategory, NewSubCategory, SubCategory, SubCategoryUpdate,
};
use crate::domain::types::{CategoryId, Slug, SubCategoryId};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, NewSubCategory as DbNewSubCategory,
    SubCategory as DbSubCategory,
};
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, RepositoryError, RepositoryResult,
    SubCategoryReader, SubCategoryWriter,
};

impl CategoryReader for DieselRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table
            .order((categories::name.asc(), categories::id.asc()))
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::slug.eq(slug))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(TryInto::try_into).transpose()?)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id.get())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(TryInto::try_into).transpose()?)
    }

    fn category_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            categories::table.filter(categories::slug.eq(slug.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(&db_category)
            .returning(DbCategory::as_returning())
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(&self, id: CategoryId, update: &CategoryUpdate) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::update(categories::table.find(id.get()))
            .set((
                categories::name.eq(update.name.as_str()),
                categories::font_awesome_icon.eq(update.font_awesome_icon.as_str()),
                categories::description.eq(update.description.as_str()),
                categories::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let affected = diesel::delete(categories::table.find(id.get())).execute(&mut conn)?;

        Ok(affected)
    }
}

impl SubCategoryReader for DieselRepository {
    fn list_subcategories(
        &self,
        category_slug: Option<&str>,
    ) -> RepositoryResult<Vec<SubCategory>> {
        use crate::schema::{categories, subcategories};

        let mut conn = self.conn()?;

        let mut query = subcategories::table
            .inner_join(categories::table)
            .select((DbSubCategory::as_select(), categories::name))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(slug) = category_slug {
            query = query.filter(categories::slug.eq(slug));
        }

        let items = query
            .order((subcategories::name.asc(), subcategories::id.asc()))
            .load::<(DbSubCategory, String)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<SubCategory>, _>>()?;

        Ok(items)
    }

    fn get_subcategory_by_slug(&self, slug: &str) -> RepositoryResult<Option<SubCategory>> {
        use crate::schema::{categories, subcategories};

        let mut conn = self.conn()?;

        let subcategory = subcategories::table
            .inner_join(categories::table)
            .filter(subcategories::slug.eq(slug))
            .select((DbSubCategory::as_select(), categories::name))
            .first::<(DbSubCategory, String)>(&mut conn)
            .optional()?;

        Ok(subcategory.map(TryInto::try_into).transpose()?)
    }

    fn get_subcategory_by_id(&self, id: SubCategoryId) -> RepositoryResult<Option<SubCategory>> {
        use crate::schema::{categories, subcategories};

        let mut conn = self.conn()?;

        let subcategory = subcategories::table
            .inner_join(categories::table)
            .filter(subcategories::id.eq(id.get()))
            .select((DbSubCategory::as_select(), categories::name))
            .first::<(DbSubCategory, String)>(&mut conn)
            .optional()?;

        Ok(subcategory.map(TryInto::try_into).transpose()?)
    }

    fn subcategory_slug_exists(&self, slug: &Slug) -> RepositoryResult<bool> {
        use crate::schema::subcategories;

        let mut conn = self.conn()?;

        let exists = diesel::select(diesel::dsl::exists(
            subcategories::table.filter(subcategories::slug.eq(slug.as_str())),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(exists)
    }
}

impl SubCategoryWriter for DieselRepository {
    fn create_subcategory(&self, subcategory: &NewSubCategory) -> RepositoryResult<SubCategory> {
        use crate::schema::{categories, subcategories};

        let mut conn = self.conn()?;
        let db_subcategory: DbNewSubCategory = subcategory.clone().into();

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(subcategories::table)
                .values(&db_subcategory)
                .returning(DbSubCategory::as_returning())
                .get_result::<DbSubCategory>(conn)?;
            let category_name = categories::table
                .find(row.category_id)
                .select(categories::name)
                .first::<String>(conn)?;
            Ok((row, category_name))
        })?;

        Ok(created.try_into()?)
    }

    fn update_subcategory(
        &self,
        id: SubCategoryId,
        update: &SubCategoryUpdate,
    ) -> RepositoryResult<usize> {
        use crate::schema::subcategories;

        let mut conn = self.conn()?;

        let affected = diesel::update(subcategories::table.find(id.get()))
            .set((
                subcategories::name.eq(update.name.as_str()),
                subcategories::description.eq(update.description.as_str()),
                subcategories::category_id.eq(update.category_id.get()),
                subcategories::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_subcategory(&self, id: SubCategoryId) -> RepositoryResult<usize> {
        use crate::schema::subcategories;

        let mut conn = self.conn()?;

        let affected = diesel::delete(subcategories::table.find(id.get())).execute(&mut conn)?;

        Ok(affected)
    }
}
