// Shared backend for integration tests: a small directory of users.

#![allow(dead_code)]

use std::sync::Arc;

use dataql::{Args, CallError, Object, Registry, RegistryBuilder, TypeSpec, Value};

#[derive(Debug)]
pub struct Date {
    pub year: i64,
    pub month: i64,
    pub day: i64,
}

impl Date {
    pub fn strftime(&self, format: &str) -> Result<String, CallError> {
        let mut out = String::new();
        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('x') => out.push_str(&format!(
                    "{:02}/{:02}/{:02}",
                    self.month,
                    self.day,
                    self.year % 100
                )),
                Some('F') => out.push_str(&self.render()),
                Some('Y') => out.push_str(&format!("{:04}", self.year)),
                Some('m') => out.push_str(&format!("{:02}", self.month)),
                Some('d') => out.push_str(&format!("{:02}", self.day)),
                Some('%') => out.push('%'),
                Some(other) => {
                    return Err(CallError::message(format!("unsupported directive %{}", other)));
                }
                None => return Err(CallError::message("dangling '%'")),
            }
        }
        Ok(out)
    }
}

impl Object for Date {
    fn type_name(&self) -> &str {
        "Date"
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "year" => Some(Value::Integer(self.year)),
            "month" => Some(Value::Integer(self.month)),
            "day" => Some(Value::Integer(self.day)),
            _ => None,
        }
    }

    fn call(&self, name: &str, args: &Args) -> Option<Result<Value, CallError>> {
        match name {
            "strftime" => Some(
                args.check_params(&["format"])
                    .and_then(|_| args.string(0, "format"))
                    .and_then(|format| self.strftime(format))
                    .map(Value::String),
            ),
            _ => None,
        }
    }

    fn render(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug)]
pub struct Company {
    pub name: String,
    pub created_year: i64,
}

impl Object for Company {
    fn type_name(&self) -> &str {
        "Company"
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(self.name.as_str())),
            "created_year" => Some(Value::Integer(self.created_year)),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct User {
    pub name: String,
    pub birthday: Arc<Date>,
    pub companies: Vec<Arc<Company>>,
    pub secret_field: String,
}

impl Object for User {
    fn type_name(&self) -> &str {
        "User"
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(self.name.as_str())),
            "birthday" => Some(Value::Object(self.birthday.clone())),
            "companies" => Some(Value::List(
                self.companies
                    .iter()
                    .map(|company| Value::Object(company.clone()))
                    .collect(),
            )),
            "secret_field" => Some(Value::from(self.secret_field.as_str())),
            _ => None,
        }
    }
}

/// Entry point value: looks users up by name.
#[derive(Debug)]
pub struct Directory {
    pub users: Vec<Arc<User>>,
}

impl Object for Directory {
    fn type_name(&self) -> &str {
        "Directory"
    }

    fn call(&self, name: &str, args: &Args) -> Option<Result<Value, CallError>> {
        match name {
            "get" => Some(args.check_params(&["name"]).and_then(|_| {
                let wanted = args.string(0, "name")?;
                Ok(self
                    .users
                    .iter()
                    .find(|user| user.name == wanted)
                    .map_or(Value::Null, |user| Value::Object(user.clone())))
            })),
            "all" => Some(args.check_params(&[]).map(|_| {
                Value::List(self.users.iter().map(|u| Value::Object(u.clone())).collect())
            })),
            _ => None,
        }
    }

    fn elements(&self) -> Option<Vec<Value>> {
        Some(self.users.iter().map(|u| Value::Object(u.clone())).collect())
    }
}

pub fn elon() -> User {
    User {
        name: "Elon Musk".to_string(),
        birthday: Arc::new(Date {
            year: 1971,
            month: 6,
            day: 28,
        }),
        companies: vec![
            Arc::new(Company {
                name: "SpaceX".to_string(),
                created_year: 2002,
            }),
            Arc::new(Company {
                name: "Tesla".to_string(),
                created_year: 2003,
            }),
        ],
        secret_field: "hunter2".to_string(),
    }
}

pub fn ada() -> User {
    User {
        name: "Ada Lovelace".to_string(),
        birthday: Arc::new(Date {
            year: 1815,
            month: 12,
            day: 10,
        }),
        companies: vec![],
        secret_field: "engine".to_string(),
    }
}

pub fn directory() -> Arc<Directory> {
    Arc::new(Directory {
        users: vec![Arc::new(elon()), Arc::new(ada())],
    })
}

/// Declarations for the directory backend; `secret_field` is never allowed.
pub fn builder() -> RegistryBuilder {
    let directory = directory();
    Registry::builder()
        .register(TypeSpec::new("Directory").allow("get").allow("all"))
        .register(TypeSpec::new("User").allow("name").allow("birthday").allow("companies"))
        .register(
            TypeSpec::new("Date")
                .allow("year")
                .allow("month")
                .allow("day")
                .allow("strftime"),
        )
        .register(TypeSpec::new("Company").allow("name").allow("created_year"))
        .register_entry_point("User", move |args| {
            args.check_params(&[])?;
            Ok(Value::Object(directory.clone()))
        })
}

pub fn registry() -> Registry {
    builder().build().unwrap()
}
