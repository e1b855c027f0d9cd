//! Demo point shared between the `/point` resource and the introspection variables.

use tokio::sync::Mutex;

use crate::prelude::*;
use crate::sample::Point;

/// Single mutable point, every update holds the lock.
#[derive(Clone, Default)]
pub struct SharedPoint(Arc<Mutex<Point>>);

impl SharedPoint {
    pub async fn get(&self) -> Point {
        *self.0.lock().await
    }

    pub async fn increment_x(&self) -> Point {
        let mut point = self.0.lock().await;
        point.x += 1.0;
        *point
    }

    pub async fn set(&self, x: f64, y: f64) -> Point {
        let mut point = self.0.lock().await;
        *point = Point::new(x, y);
        *point
    }
}
