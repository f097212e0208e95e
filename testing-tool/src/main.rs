use anyhow::{anyhow, bail, Result};
use colored::*;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::io::{self, Write};

struct Session {
    client: Client,
    base_url: String,
    token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚐 Shuttle Rides - Consola de conductor".bright_blue().bold());
    println!("{}", "=======================================".bright_blue());
    println!();

    let base_url = prompt("URL del servidor [http://localhost:3000]: ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };

    let session = login(base_url).await?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🗓️  Ver assignments de hoy");
        println!("2. 🧭 Recorrer un assignment");
        println!("3. 🚪 Salir");

        match prompt("Selecciona una opción (1-3): ")?.as_str() {
            "1" => {
                if let Err(e) = show_assignments(&session).await {
                    println!("{} {}", "❌".bright_red(), e);
                }
            }
            "2" => {
                if let Err(e) = walk_assignment(&session).await {
                    println!("{} {}", "❌".bright_red(), e);
                }
            }
            "3" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

async fn login(base_url: String) -> Result<Session> {
    println!();
    println!("{}", "🔐 LOGIN".bright_cyan().bold());
    let email = prompt("Email: ")?;
    let password = prompt("Password: ")?;

    let client = Client::new();
    let response = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;
    if !status.is_success() {
        bail!("Login fallido ({}): {}", status, body["message"]);
    }

    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow!("La respuesta de login no trae token"))?
        .to_string();
    println!(
        "{} {} ({})",
        "✅ Sesión iniciada como".bright_green(),
        body["user"]["name"],
        body["user"]["role"]
    );

    Ok(Session { client, base_url, token })
}

impl Session {
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            bail!("{} {}: {}", status, body["code"], body["message"]);
        }
        Ok(body)
    }
}

async fn show_assignments(session: &Session) -> Result<Vec<Value>> {
    let body = session.call(Method::GET, "/api/driver/assignments", None).await?;
    let assignments = body.as_array().cloned().unwrap_or_default();

    if assignments.is_empty() {
        println!("{}", "📭 No tienes assignments para hoy".bright_yellow());
        return Ok(assignments);
    }

    for (position, assignment) in assignments.iter().enumerate() {
        println!(
            "{}. {} {} [{}] {}/{}",
            position + 1,
            assignment["scheduledStartTime"].as_str().unwrap_or("--:--").bright_white(),
            assignment["route"]["name"].as_str().unwrap_or("?"),
            assignment["status"].as_str().unwrap_or("?").bright_cyan(),
            assignment["currentStopIndex"],
            assignment["totalStops"],
        );
    }
    Ok(assignments)
}

async fn walk_assignment(session: &Session) -> Result<()> {
    let assignments = show_assignments(session).await?;
    if assignments.is_empty() {
        return Ok(());
    }

    let choice: usize = prompt("Número de assignment: ")?.parse()?;
    let assignment = assignments
        .get(choice.wrapping_sub(1))
        .ok_or_else(|| anyhow!("Assignment fuera de rango"))?;
    let id = assignment["id"].as_str().ok_or_else(|| anyhow!("Assignment sin id"))?;

    loop {
        let next = session
            .call(Method::GET, &format!("/api/driver/assignments/{}/next-stop", id), None)
            .await?;

        if next["finished"].as_bool().unwrap_or(false) {
            println!("{}", "🏁 Ruta completada".bright_green().bold());
            return Ok(());
        }

        let index = next["currentStopIndex"].as_i64().unwrap_or(0);
        println!();
        println!(
            "{} {} ({}) {}/{}",
            "📍 Siguiente parada:".bright_blue(),
            next["nextStop"]["name"].as_str().unwrap_or("?").bold(),
            next["nextStop"]["kind"].as_str().unwrap_or("?"),
            index + 1,
            next["totalStops"],
        );

        match prompt("[c] completar, [r] reiniciar, [q] volver: ")?.as_str() {
            "c" => {
                let body = json!({ "stopIndex": index });
                match session
                    .call(Method::PUT, &format!("/api/driver/assignments/{}/progress", id), Some(body))
                    .await
                {
                    Ok(_) => println!("{}", "✅ Parada completada".bright_green()),
                    // Otro dispositivo pudo avanzar antes: se relee la siguiente parada
                    Err(e) => println!("{} {}", "🔁".bright_yellow(), e),
                }
            }
            "r" => {
                session
                    .call(Method::POST, &format!("/api/driver/assignments/{}/reset", id), None)
                    .await?;
                println!("{}", "⏮️ Progreso reiniciado".bright_yellow());
            }
            "q" => return Ok(()),
            _ => println!("{}", "❌ Opción inválida".bright_red()),
        }
    }
}
