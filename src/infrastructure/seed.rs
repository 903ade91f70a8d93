use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde_json::json;

use crate::domain::{AuthMethod, SensorStatus, SensorType};
use crate::infrastructure::auth::hash_password;
use crate::infrastructure::db::now_timestamp;
use crate::models::{sensor, user};

struct DemoSensor {
    name: &'static str,
    sensor_type: SensorType,
    location: &'static str,
    connection_config: serde_json::Value,
}

fn demo_user(
    username: &str,
    first_name: &str,
    auth_method: AuthMethod,
    password_hash: Option<String>,
    pin_hash: Option<String>,
) -> user::ActiveModel {
    let now = now_timestamp();
    user::ActiveModel {
        username: Set(username.to_owned()),
        email: Set(None),
        first_name: Set(first_name.to_owned()),
        last_name: Set(String::new()),
        auth_method: Set(auth_method.as_str().to_owned()),
        password_hash: Set(password_hash),
        pin_hash: Set(pin_hash),
        phone_number: Set(None),
        notification_enabled: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Insert the demo accounts and the admin's sensors. Running it twice is a no-op.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let admin_password = hash_password("admin").map_err(DbErr::Custom)?;
    let keypad_pin = hash_password("1234").map_err(DbErr::Custom)?;

    let users = [
        demo_user("admin", "Admin", AuthMethod::Password, Some(admin_password), None),
        demo_user("keypad", "Keypad", AuthMethod::Pin, None, Some(keypad_pin)),
    ];

    for model in users {
        user::Entity::insert(model)
            .on_conflict(
                OnConflict::column(user::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    let Some(admin) = user::Entity::find()
        .filter(user::Column::Username.eq("admin"))
        .one(db)
        .await?
    else {
        return Err(DbErr::RecordNotFound("admin user".to_string()));
    };

    let sensors = [
        DemoSensor {
            name: "Front Door",
            sensor_type: SensorType::DoorContact,
            location: "front door",
            connection_config: json!({ "protocol": "zigbee" }),
        },
        DemoSensor {
            name: "Back Window",
            sensor_type: SensorType::WindowContact,
            location: "kitchen",
            connection_config: json!({ "protocol": "zigbee" }),
        },
        DemoSensor {
            name: "Driveway Camera",
            sensor_type: SensorType::Camera,
            location: "driveway",
            connection_config: json!({ "stream_url": "rtsp://192.168.1.50/stream" }),
        },
    ];

    for demo in sensors {
        let exists = sensor::Entity::find()
            .filter(sensor::Column::OwnerId.eq(admin.id))
            .filter(sensor::Column::Name.eq(demo.name))
            .count(db)
            .await?
            > 0;
        if exists {
            continue;
        }

        let now = now_timestamp();
        sensor::ActiveModel {
            name: Set(demo.name.to_owned()),
            sensor_type: Set(demo.sensor_type.as_str().to_owned()),
            location: Set(demo.location.to_owned()),
            status: Set(SensorStatus::Active.as_str().to_owned()),
            handler_class: Set(None),
            connection_config: Set(demo.connection_config.to_string()),
            metadata: Set("{}".to_owned()),
            owner_id: Set(admin.id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    tracing::info!("Demo data ready (users: admin, keypad)");
    Ok(())
}
