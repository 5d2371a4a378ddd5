// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::person::Person;
use ripple_core::EqualityPolicy;

pub fn person_alice() -> Person {
    Person::new("Alice".to_string(), 25)
}

pub fn person_bob() -> Person {
    Person::new("Bob".to_string(), 30)
}

pub fn person_charlie() -> Person {
    Person::new("Charlie".to_string(), 35)
}

pub fn person_diane() -> Person {
    Person::new("Diane".to_string(), 40)
}

pub fn person(name: &str, age: u32) -> Person {
    Person::new(name.to_string(), age)
}

/// Two people are the same when their names match, whatever their age.
pub fn same_name() -> EqualityPolicy<Person> {
    EqualityPolicy::new(|a: &Person, b: &Person| a.name == b.name)
}

/// Two vectors are the same when their sums match.
pub fn same_sum() -> EqualityPolicy<Vec<i32>> {
    EqualityPolicy::new(|a: &Vec<i32>, b: &Vec<i32>| {
        a.iter().sum::<i32>() == b.iter().sum::<i32>()
    })
}
