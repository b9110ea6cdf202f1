/// Form fields of `POST /api2/json/access/ticket`.
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl LoginRequest<'_> {
    /// Encodes the request as an `application/x-www-form-urlencoded` body.
    pub fn to_form_body(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", self.username)
            .append_pair("password", self.password)
            .finish()
    }
}
