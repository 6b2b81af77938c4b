//! Built-in Java unit indexed when no root directory is given.

/// Label used for the sample unit in logs and errors.
pub const SAMPLE_LABEL: &str = "<sample>";

/// A small service with a nested helper class and two sibling classes.
pub const SAMPLE_JAVA: &str = r#"
package com.acme.demo;

import java.util.*;

public class UserService {
    private final UserRepository repo = new UserRepository();

    public UserService() {
        System.out.println("UserService constructed");
    }

    public User addUser(String name) {
        // Call into our repository and also use a static helper
        repo.save(name);
        String trimmed = StringUtils.trim(name);
        return new User(trimmed);
    }

    public void printAll() {
        List<String> all = repo.findAll();
        for (String n : all) {
            System.out.println(n);
        }
    }

    static class StringUtils {
        static String trim(String s) { return s.trim(); }
    }
}

class UserRepository {
    List<String> store = new ArrayList<>();
    public void save(String name) { store.add(name); }
    public List<String> findAll() { return store; }
}

class User {
    private final String name;
    public User(String name) { this.name = name; }
}
"#;
