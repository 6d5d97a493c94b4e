//! Migración del schema
//!
//! Crea las tablas del taller si no existen y, opcionalmente, inserta
//! datos de prueba (usuarios, clientes y repuestos iniciales).

use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use tracing::info;

use crate::utils::errors::AppError;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS usuario (
        id_usuario SERIAL PRIMARY KEY,
        nombre VARCHAR(100) NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL,
        password VARCHAR(255) NOT NULL,
        rol VARCHAR(20) NOT NULL DEFAULT 'cliente',
        fecha_registro TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        activo BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cliente (
        id_cliente SERIAL PRIMARY KEY,
        nombre VARCHAR(100) NOT NULL,
        telefono VARCHAR(20) NOT NULL,
        correo VARCHAR(100) UNIQUE NOT NULL,
        direccion VARCHAR(200),
        fecha_registro TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        activo BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vehiculo (
        id_vehiculo SERIAL PRIMARY KEY,
        placa VARCHAR(20) UNIQUE NOT NULL,
        marca VARCHAR(50) NOT NULL,
        modelo VARCHAR(50) NOT NULL,
        anio INTEGER NOT NULL,
        color VARCHAR(30),
        tipo_vehiculo VARCHAR(30),
        kilometraje INTEGER NOT NULL DEFAULT 0,
        id_cliente INTEGER NOT NULL,
        fecha_registro TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (id_cliente) REFERENCES cliente(id_cliente) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS repuesto (
        id_repuesto SERIAL PRIMARY KEY,
        codigo VARCHAR(50) UNIQUE NOT NULL,
        nombre VARCHAR(100) NOT NULL,
        descripcion TEXT,
        marca VARCHAR(50),
        precio_unitario DECIMAL(10,2) NOT NULL,
        stock_actual INTEGER NOT NULL DEFAULT 0 CHECK (stock_actual >= 0),
        stock_minimo INTEGER NOT NULL DEFAULT 5,
        unidad_medida VARCHAR(20) NOT NULL DEFAULT 'unidad',
        activo BOOLEAN NOT NULL DEFAULT TRUE,
        fecha_registro TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orden_servicio (
        id_orden SERIAL PRIMARY KEY,
        fecha_ingreso TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
        fecha_estimada TIMESTAMPTZ,
        fecha_finalizacion TIMESTAMPTZ,
        estado VARCHAR(20) NOT NULL DEFAULT 'diagnostico',
        diagnostico TEXT,
        observaciones TEXT,
        costo_mano_obra DECIMAL(10,2) NOT NULL DEFAULT 0.00,
        costo_total DECIMAL(10,2) NOT NULL DEFAULT 0.00,
        id_vehiculo INTEGER NOT NULL,
        id_mecanico INTEGER,
        fecha_creacion TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (id_vehiculo) REFERENCES vehiculo(id_vehiculo) ON DELETE CASCADE,
        FOREIGN KEY (id_mecanico) REFERENCES usuario(id_usuario) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS uso_repuesto (
        id_uso SERIAL PRIMARY KEY,
        id_orden INTEGER NOT NULL,
        id_repuesto INTEGER NOT NULL,
        cantidad INTEGER NOT NULL DEFAULT 1,
        precio_unitario DECIMAL(10,2) NOT NULL,
        subtotal DECIMAL(10,2) NOT NULL,
        fecha_registro TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (id_orden) REFERENCES orden_servicio(id_orden) ON DELETE CASCADE,
        FOREIGN KEY (id_repuesto) REFERENCES repuesto(id_repuesto) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS factura (
        id_factura SERIAL PRIMARY KEY,
        id_orden INTEGER NOT NULL UNIQUE,
        fecha_emision TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        subtotal DECIMAL(10,2) NOT NULL,
        iva DECIMAL(10,2) NOT NULL DEFAULT 0.00,
        descuento DECIMAL(10,2) NOT NULL DEFAULT 0.00,
        total DECIMAL(10,2) NOT NULL,
        metodo_pago VARCHAR(50),
        estado VARCHAR(20) NOT NULL DEFAULT 'pendiente',
        observaciones TEXT,
        FOREIGN KEY (id_orden) REFERENCES orden_servicio(id_orden) ON DELETE CASCADE
    )
    "#,
    // Sin endpoints todavía; la tabla existe para paridad de schema
    r#"
    CREATE TABLE IF NOT EXISTS notificacion (
        id_notificacion SERIAL PRIMARY KEY,
        id_cliente INTEGER NOT NULL,
        id_orden INTEGER,
        tipo VARCHAR(50) NOT NULL,
        mensaje TEXT NOT NULL,
        fecha_envio TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        leida BOOLEAN NOT NULL DEFAULT FALSE,
        fecha_lectura TIMESTAMPTZ,
        FOREIGN KEY (id_cliente) REFERENCES cliente(id_cliente) ON DELETE CASCADE,
        FOREIGN KEY (id_orden) REFERENCES orden_servicio(id_orden) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_vehiculo_cliente ON vehiculo(id_cliente)",
    "CREATE INDEX IF NOT EXISTS idx_orden_vehiculo ON orden_servicio(id_vehiculo)",
    "CREATE INDEX IF NOT EXISTS idx_orden_estado ON orden_servicio(estado)",
];

/// Crear las tablas e índices del taller (idempotente)
pub async fn run(pool: &PgPool) -> Result<(), AppError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("✅ Schema de base de datos verificado");
    Ok(())
}

/// Insertar datos de prueba: usuarios, clientes y repuestos iniciales
pub async fn seed_demo_data(pool: &PgPool) -> Result<(), AppError> {
    let admin_password = hash("admin123", DEFAULT_COST)?;
    let mecanico_password = hash("mecanico123", DEFAULT_COST)?;
    let cliente_password = hash("cliente123", DEFAULT_COST)?;

    sqlx::query(
        r#"
        INSERT INTO usuario (nombre, email, password, rol)
        VALUES
            ('Admin Sistema', 'admin@autotrackpro.com', $1, 'administrador'),
            ('Carlos Méndez', 'cmendez@taller.com', $2, 'mecanico'),
            ('Juan Pérez', 'jperez@email.com', $3, 'cliente')
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(&admin_password)
    .bind(&mecanico_password)
    .bind(&cliente_password)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO cliente (nombre, telefono, correo, direccion)
        VALUES
            ('Juan Pérez', '3001234567', 'jperez@email.com', 'Calle 10 #20-30'),
            ('María Gómez', '3109876543', 'mgomez@email.com', 'Carrera 5 #15-25'),
            ('Pedro López', '3201112233', 'plopez@email.com', 'Avenida 8 #30-40')
        ON CONFLICT (correo) DO NOTHING
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO repuesto (codigo, nombre, descripcion, marca, precio_unitario, stock_actual)
        VALUES
            ('REP001', 'Filtro de Aceite', 'Filtro de aceite para motor', 'Bosch', 25000, 50),
            ('REP002', 'Pastillas de Freno', 'Juego de pastillas delanteras', 'Brembo', 120000, 30),
            ('REP003', 'Aceite 10W-40', 'Aceite sintético para motor', 'Castrol', 45000, 40),
            ('REP004', 'Batería 12V', 'Batería sellada 12V 45Ah', 'MAC', 280000, 15),
            ('REP005', 'Llantas 195/65R15', 'Llanta radial', 'Michelin', 350000, 20)
        ON CONFLICT (codigo) DO NOTHING
        "#,
    )
    .execute(pool)
    .await?;

    info!("📊 Datos de prueba insertados");
    Ok(())
}
