pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::packages::requests::{
    CreatePackageRequest, PackageListParams, UpdatePackageRequest,
};

super::define_service!(PackageService);

/// 课时数与有效期必须为正，价格不能为负
pub(crate) fn validate_package_numbers(
    classes_count: Option<i32>,
    price: Option<i64>,
    validity_days: Option<i32>,
) -> Result<(), &'static str> {
    if classes_count.is_some_and(|c| c <= 0) {
        return Err("classes_count must be positive");
    }
    if price.is_some_and(|p| p < 0) {
        return Err("price must not be negative");
    }
    if validity_days.is_some_and(|d| d <= 0) {
        return Err("validity_days must be positive");
    }
    Ok(())
}

impl PackageService {
    pub async fn list_packages(
        &self,
        query: PackageListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_packages(self, query, request).await
    }

    pub async fn create_package(
        &self,
        body: CreatePackageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_package(self, body, request).await
    }

    pub async fn update_package(
        &self,
        package_id: i64,
        body: UpdatePackageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_package(self, package_id, body, request).await
    }

    pub async fn delete_package(
        &self,
        package_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_package(self, package_id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_package_numbers() {
        assert!(validate_package_numbers(Some(8), Some(4000), Some(60)).is_ok());
        assert!(validate_package_numbers(None, None, None).is_ok());
        assert!(validate_package_numbers(Some(0), None, None).is_err());
        assert!(validate_package_numbers(None, Some(-1), None).is_err());
        assert!(validate_package_numbers(None, None, Some(0)).is_err());
    }
}
