use oso::PolarClass;
use serde::{Deserialize, Serialize};

use crate::entities::{Profile, Role};

/// The logged-in user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }

    pub fn is_passenger(&self) -> bool {
        self.role == Role::Passenger
    }

    fn role_name(&self) -> String {
        self.role.name().into()
    }
}

impl From<Profile> for User {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
        }
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id.clone())
            .add_attribute_getter("role", User::role_name)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}
