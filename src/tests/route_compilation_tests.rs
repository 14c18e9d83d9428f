/// Tests to ensure route assembly and the API document stay in sync

#[cfg(test)]
mod tests {
    use crate::swagger::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_all_route_modules_compile() {
        let _users_router = crate::routes::users::router();
        let _swagger_router = crate::swagger::create_swagger_router();
        let _app = crate::test_utils::TestContext::new().app;
    }

    #[test]
    fn test_openapi_documents_every_user_endpoint() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/user"));
        assert!(paths.contains_key("/user/{userId}"));
        assert!(paths.contains_key("/users"));

        let by_id = &paths["/user/{userId}"];
        assert!(by_id.get.is_some());
        assert!(by_id.put.is_some());
        assert!(by_id.delete.is_some());
    }
}
